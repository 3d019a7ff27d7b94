use horde_collision::*;
use std::sync::{Arc, Mutex};
use std::thread;

fn horde(engine: &mut CollisionEngine) {
    for i in 0..200 {
        let angle = i as f32 * 0.37;
        let radius = 20.0 + (i % 40) as f32 * 3.0;
        engine.add_body(Body::new(
            Vec2::new(angle.cos() * radius, angle.sin() * radius),
            Collider::circle(10.0).enemy().build(),
        ));
    }
    engine.add_body(Body::new(Vec2::ZERO, Collider::circle(16.0).player().build()));
}

#[test]
fn engine_is_sync_and_send() {
    fn assert_sync_send<T: Sync + Send>() {}
    assert_sync_send::<CollisionEngine>();
    assert_sync_send::<CollisionWorld>();
    assert_sync_send::<CollisionRecordList>();
}

#[test]
fn shared_engine_across_threads() {
    let mut engine = CollisionEngine::new(EngineConfig::default()).unwrap();
    horde(&mut engine);
    engine.set_collision_strategy(CollisionStrategy::SpatialHash);
    let engine = Arc::new(Mutex::new(engine));

    let mut handles = vec![];
    for _ in 0..4 {
        let engine_clone = Arc::clone(&engine);
        let handle = thread::spawn(move || {
            let mut engine = engine_clone.lock().unwrap();
            engine.tick();
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(!engine.lock().unwrap().world().has_collision_state());
}

#[test]
fn parallel_and_sequential_detection_agree() {
    for strategy in CollisionStrategy::ALL {
        let mut detected = Vec::new();
        for parallel in [false, true] {
            let mut engine =
                CollisionEngine::new(EngineConfig::default().with_parallel(parallel)).unwrap();
            horde(&mut engine);
            engine.set_collision_strategy(strategy);
            engine.on_bodies_moved();
            engine.run_detection();
            detected.push(engine.detected_pairs());
            engine.run_cleanup();
        }
        assert!(!detected[0].is_empty(), "{strategy}");
        assert_eq!(detected[0], detected[1], "{strategy}");
    }
}

use approx::assert_relative_eq;
use horde_collision::*;

fn two_circles(engine: &mut CollisionEngine) -> (EntityId, EntityId) {
    let a = engine.add_body(Body::new(Vec2::ZERO, Collider::circle(16.0).enemy().build()));
    let b = engine.add_body(Body::new(
        Vec2::new(20.0, 0.0),
        Collider::circle(16.0).enemy().build(),
    ));
    (a, b)
}

fn distance(engine: &CollisionEngine, a: EntityId, b: EntityId) -> f32 {
    engine
        .body(a)
        .unwrap()
        .position
        .distance(engine.body(b).unwrap().position)
}

#[test]
fn overlapping_circles_separate_to_touching() {
    let contact = NarrowPhase::collide(
        Vec2::ZERO,
        &Collider::circle(16.0).build(),
        Vec2::new(20.0, 0.0),
        &Collider::circle(16.0).build(),
    )
    .expect("distance 20 < 32");
    assert_relative_eq!(contact.depth(), 12.0);

    for strategy in CollisionStrategy::ALL {
        let mut engine =
            CollisionEngine::new(EngineConfig::default().with_correction_damping(1.0)).unwrap();
        let (a, b) = two_circles(&mut engine);
        engine.set_collision_strategy(strategy);

        engine.on_bodies_moved();
        engine.run_detection();
        assert_eq!(engine.detected_pairs(), vec![(a, b)], "{strategy}");
        engine.run_resolution();
        engine.run_cleanup();

        assert_relative_eq!(distance(&engine, a, b), 32.0, epsilon = 1e-4);
    }
}

#[test]
fn default_damping_closes_three_quarters_per_pass() {
    let mut engine =
        CollisionEngine::new(EngineConfig::default().with_solver_passes(1)).unwrap();
    let (a, b) = two_circles(&mut engine);
    engine.set_collision_strategy(CollisionStrategy::RecordList);
    engine.tick();

    assert_relative_eq!(distance(&engine, a, b), 29.0, epsilon = 1e-4);
}

#[test]
fn circle_far_from_static_box_does_not_collide() {
    assert!(NarrowPhase::collide(
        Vec2::ZERO,
        &Collider::circle(16.0).build(),
        Vec2::new(100.0, 100.0),
        &Collider::rect(48.0, 48.0).environment().build(),
    )
    .is_none());

    for strategy in CollisionStrategy::ALL {
        let mut engine = CollisionEngine::new(EngineConfig::default()).unwrap();
        engine.add_body(Body::new(Vec2::ZERO, Collider::circle(16.0).player().build()));
        engine.add_body(Body::new(
            Vec2::new(100.0, 100.0),
            Collider::rect(48.0, 48.0).environment().build(),
        ));
        engine.set_collision_strategy(strategy);
        assert_eq!(engine.tick(), TickSummary::default(), "{strategy}");
    }
}

#[test]
fn player_pushed_out_of_wall() {
    for strategy in CollisionStrategy::ALL {
        let mut engine =
            CollisionEngine::new(EngineConfig::default().with_correction_damping(1.0)).unwrap();
        let player = engine.add_body(Body::new(
            Vec2::new(-30.0, 0.0),
            Collider::circle(16.0).player().build(),
        ));
        let wall = engine.add_body(Body::new(
            Vec2::ZERO,
            Collider::rect(48.0, 48.0).environment().build(),
        ));
        engine.set_collision_strategy(strategy);

        engine.on_bodies_moved();
        engine.run_detection();
        engine.run_resolution();
        assert_eq!(engine.significant_pairs(), vec![(player, wall)], "{strategy}");
        engine.run_cleanup();

        assert_relative_eq!(engine.body(player).unwrap().position.x, -40.0, epsilon = 1e-4);
        assert_eq!(engine.body(wall).unwrap().position, Vec2::ZERO);
    }
}

#[test]
fn enemy_against_wall_is_corrected_but_not_significant() {
    for strategy in CollisionStrategy::ALL {
        let mut engine = CollisionEngine::new(EngineConfig::default()).unwrap();
        let enemy = engine.add_body(Body::new(
            Vec2::new(0.0, -30.0),
            Collider::circle(16.0).enemy().build(),
        ));
        engine.add_body(Body::new(
            Vec2::ZERO,
            Collider::rect(48.0, 48.0).environment().build(),
        ));
        engine.set_collision_strategy(strategy);

        let summary = engine.tick();
        assert_eq!(summary.detected_pairs, 1, "{strategy}");
        assert_eq!(summary.significant_pairs, 0, "{strategy}");
        assert!(engine.body(enemy).unwrap().position.y < -30.0, "{strategy}");
    }
}

#[test]
fn later_solver_passes_do_not_report_again() {
    let mut engine = CollisionEngine::new(EngineConfig::default()).unwrap();
    let player = engine.add_body(Body::new(Vec2::ZERO, Collider::circle(16.0).player().build()));
    let enemy = engine.add_body(Body::new(
        Vec2::new(20.0, 0.0),
        Collider::circle(16.0).enemy().build(),
    ));
    engine.set_collision_strategy(CollisionStrategy::RecordList);

    engine.on_bodies_moved();
    engine.run_detection();
    engine.run_resolution();

    // the pair still overlaps after pass 0, yet it is reported once
    let list = engine.world().record_list.lock();
    assert_eq!(list.significant_pairs(), vec![(player, enemy)]);
    assert_eq!(list.collisions_info.len(), 1);
}

#[test]
fn bodies_steer_towards_desired_velocity() {
    let mut engine = CollisionEngine::new(EngineConfig::default()).unwrap();
    let runner = engine.add_body(
        Body::builder()
            .position(Vec2::new(0.0, 0.0))
            .desired_velocity(Vec2::new(100.0, 0.0))
            .collider(Collider::circle(8.0).enemy().build())
            .build(),
    );
    engine.set_collision_strategy(CollisionStrategy::SpatialHash);

    let ticks = engine.step(0.5);
    assert_eq!(ticks, 31);
    let body = engine.body(runner).unwrap();
    assert!(body.velocity.x > 90.0 && body.velocity.x <= 100.0);
    assert!(body.position.x > 20.0);
    let grid = &engine.world().grid;
    assert_eq!(grid.cell_of(runner), Some(grid.cell_coord(body.position)));
}

#[test]
fn crowd_settles_under_the_iterative_solver() {
    let mut engine = CollisionEngine::new(EngineConfig::default()).unwrap();
    for i in 0..16 {
        engine.add_body(Body::new(
            Vec2::new((i % 4) as f32 * 4.0, (i / 4) as f32 * 4.0),
            Collider::circle(8.0).enemy().build(),
        ));
    }
    engine.set_collision_strategy(CollisionStrategy::SpatialHash);

    let first = engine.tick().detected_pairs;
    for _ in 0..200 {
        engine.tick();
    }
    let last = engine.tick().detected_pairs;
    assert!(last < first, "{first} pairs at start, {last} after settling");
}

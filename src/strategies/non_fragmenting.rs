//! Relationship variant whose graph tolerates writes during the scan.
//!
//! Workers add tags straight into the graph under its lock, one lock per
//! worker buffer, so no sync point is needed.

use crate::{
    collision::broadphase::scan_all_pairs,
    simulation::{Phase, System},
    strategies::resolve_tagged,
    utils::logging::SystemTimer,
    world::CollisionWorld,
};

pub fn systems() -> Vec<System> {
    vec![
        System::new(
            "collision-relationship-dontfragment::detect",
            Phase::Detection,
            detect,
        ),
        System::new(
            "collision-relationship-dontfragment::resolve",
            Phase::Resolution,
            resolve,
        ),
        System::new(
            "collision-relationship-dontfragment::cleanup",
            Phase::Cleanup,
            cleanup,
        ),
    ]
}

pub fn detect(world: &mut CollisionWorld) {
    let _timer = SystemTimer::new("non_fragmenting::detect");
    let graph = &world.non_fragmenting;
    scan_all_pairs(&world.participants(), world.parallel(), |local| {
        let mut graph = graph.lock();
        for record in local {
            graph.add(record.a, record.b);
        }
    });
}

pub fn resolve(world: &mut CollisionWorld) {
    let _timer = SystemTimer::new("non_fragmenting::resolve");
    resolve_tagged(
        world.non_fragmenting.get_mut(),
        &mut world.bodies,
        &world.corrector,
    );
}

pub fn cleanup(world: &mut CollisionWorld) {
    world.non_fragmenting.get_mut().clear();
}

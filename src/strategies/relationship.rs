//! Parallel all-pairs detection writing "collided with" tags.
//!
//! Workers must not reshape the graph mid-scan, so each worker records add
//! commands that are applied once the scan has joined.

use crate::{
    collision::broadphase::scan_all_pairs,
    simulation::{Phase, System},
    strategies::{deferred_tags, resolve_tagged},
    utils::logging::SystemTimer,
    world::CollisionWorld,
};

pub fn systems() -> Vec<System> {
    vec![
        System::new("collision-relationship::detect", Phase::Detection, detect),
        System::new("collision-relationship::resolve", Phase::Resolution, resolve),
        System::new("collision-relationship::cleanup", Phase::Cleanup, cleanup),
    ]
}

pub fn detect(world: &mut CollisionWorld) {
    let _timer = SystemTimer::new("relationship::detect");
    let buffers = deferred_tags(|sink| {
        scan_all_pairs(&world.participants(), world.parallel(), sink);
    });
    for buffer in buffers {
        buffer.apply(&mut world.collided_with);
    }
}

pub fn resolve(world: &mut CollisionWorld) {
    let _timer = SystemTimer::new("relationship::resolve");
    resolve_tagged(&mut world.collided_with, &mut world.bodies, &world.corrector);
}

pub fn cleanup(world: &mut CollisionWorld) {
    world.collided_with.clear();
}

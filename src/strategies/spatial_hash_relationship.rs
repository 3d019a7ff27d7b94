//! Grid scan feeding the "collided with" relation through deferred commands.

use crate::{
    collision::broadphase::{scan_grid, scan_static},
    simulation::{Phase, System},
    strategies::{deferred_tags, relationship, resolve_tagged, spatial_hash},
    utils::logging::SystemTimer,
    world::CollisionWorld,
};

pub fn systems() -> Vec<System> {
    vec![
        System::new(
            "spatial-hash-relationship::init-grid",
            Phase::OnStart,
            spatial_hash::init_grid,
        ),
        System::new(
            "spatial-hash-relationship::update-grid",
            Phase::UpdateBodies,
            spatial_hash::update_grid,
        ),
        System::new("spatial-hash-relationship::detect", Phase::Detection, detect),
        System::new("spatial-hash-relationship::resolve", Phase::Resolution, resolve),
        System::new(
            "spatial-hash-relationship::cleanup",
            Phase::Cleanup,
            relationship::cleanup,
        ),
    ]
}

pub fn detect(world: &mut CollisionWorld) {
    let _timer = SystemTimer::new("spatial_hash_relationship::detect");
    let mode = world.grid.traversal_mode(world.participants().len());
    let parallel = world.parallel();
    let buffers = deferred_tags(|sink| {
        scan_grid(&world.bodies, &world.grid, mode, parallel, sink);
        scan_static(&world.bodies, &world.grid, parallel, sink);
    });
    for buffer in buffers {
        buffer.apply(&mut world.collided_with);
    }
}

pub fn resolve(world: &mut CollisionWorld) {
    let _timer = SystemTimer::new("spatial_hash_relationship::resolve");
    resolve_tagged(&mut world.collided_with, &mut world.bodies, &world.corrector);
}

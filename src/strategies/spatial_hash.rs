//! Grid-accelerated detection into the shared record list.
//!
//! Movable bodies are tested against the 3x3 block around their cell; static
//! bodies get their own pass over the cells their bounds cover.

use crate::{
    collision::{
        broadphase::{scan_grid, scan_static},
        contact::CollisionRecord,
    },
    simulation::{Phase, System},
    strategies::record_list,
    utils::logging::SystemTimer,
    world::CollisionWorld,
};

pub fn systems() -> Vec<System> {
    vec![
        System::new("spatial-hash::init-grid", Phase::OnStart, init_grid),
        System::new("spatial-hash::update-grid", Phase::UpdateBodies, update_grid),
        System::new("spatial-hash::detect", Phase::Detection, detect),
        System::new("spatial-hash::resolve", Phase::Resolution, record_list::resolve),
        System::new("spatial-hash::cleanup", Phase::Cleanup, record_list::cleanup),
    ]
}

/// Builds the grid from scratch.
pub fn init_grid(world: &mut CollisionWorld) {
    world.grid.rebuild(&world.bodies);
}

/// Moves bodies to the cell matching their current position.
pub fn update_grid(world: &mut CollisionWorld) {
    let mut timer = SystemTimer::new("spatial_hash::update_grid");
    timer.produced(world.grid.update(&world.bodies));
}

pub fn detect(world: &mut CollisionWorld) {
    let _timer = SystemTimer::new("spatial_hash::detect");
    let mode = world.grid.traversal_mode(world.participants().len());
    let parallel = world.parallel();
    let list = &world.record_list;
    let sink = |local: Vec<CollisionRecord>| list.lock().merge(local);

    scan_grid(&world.bodies, &world.grid, mode, parallel, &sink);
    scan_static(&world.bodies, &world.grid, parallel, &sink);
    record_list::sort_records(world);
}

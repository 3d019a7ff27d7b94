//! Parallel all-pairs detection into the shared [`CollisionRecordList`].
//!
//! [`CollisionRecordList`]: crate::collision::contact::CollisionRecordList

use crate::{
    collision::{broadphase::scan_all_pairs, contact::CollisionRecord, resolution::solve_records},
    simulation::{Phase, System},
    utils::logging::SystemTimer,
    world::CollisionWorld,
};

pub fn systems() -> Vec<System> {
    vec![
        System::new("record-list::detect", Phase::Detection, detect),
        System::new("record-list::resolve", Phase::Resolution, resolve),
        System::new("record-list::cleanup", Phase::Cleanup, cleanup),
    ]
}

pub fn detect(world: &mut CollisionWorld) {
    let mut timer = SystemTimer::new("record_list::detect");
    let list = &world.record_list;
    scan_all_pairs(&world.participants(), world.parallel(), |local| {
        list.lock().merge(local);
    });
    sort_records(world);
    timer.produced(world.record_list.get_mut().records.len());
}

/// Worker merge order is arbitrary; sorting keeps resolution deterministic.
pub(crate) fn sort_records(world: &mut CollisionWorld) {
    world
        .record_list
        .get_mut()
        .records
        .sort_unstable_by_key(CollisionRecord::pair);
}

/// Iterative solver shared with the spatial hash strategy.
pub fn resolve(world: &mut CollisionWorld) {
    let mut timer = SystemTimer::new("record_list::resolve");
    let passes = world.solver_passes();
    let corrections = solve_records(
        &mut world.bodies,
        world.record_list.get_mut(),
        &world.corrector,
        passes,
    );
    timer.produced(corrections);
}

pub fn cleanup(world: &mut CollisionWorld) {
    world.record_list.get_mut().clear();
}

//! One record entity per colliding pair.
//!
//! Spawning changes the entity store, so workers only collect records and the
//! entities are created after the scan joins. Significant pairs tag both
//! bodies during resolution.

use parking_lot::Mutex;

use crate::{
    collision::{broadphase::scan_all_pairs, contact::CollisionRecord, relation::CommandBuffer},
    simulation::{Phase, System},
    utils::logging::SystemTimer,
    world::CollisionWorld,
};

pub fn systems() -> Vec<System> {
    vec![
        System::new("collision-entity::detect", Phase::Detection, detect),
        System::new("collision-entity::resolve", Phase::Resolution, resolve),
        System::new("collision-entity::cleanup", Phase::Cleanup, cleanup),
    ]
}

pub fn detect(world: &mut CollisionWorld) {
    let _timer = SystemTimer::new("entity::detect");
    let spawns: Mutex<Vec<Vec<CollisionRecord>>> = Mutex::new(Vec::new());
    scan_all_pairs(&world.participants(), world.parallel(), |local| {
        spawns.lock().push(local);
    });

    for record in spawns.into_inner().into_iter().flatten() {
        world.collision_entities.insert(record);
    }
}

pub fn resolve(world: &mut CollisionWorld) {
    let _timer = SystemTimer::new("entity::resolve");
    let mut tags = CommandBuffer::new();
    let pairs: Vec<CollisionRecord> = world.collision_entities.values().copied().collect();
    for record in pairs {
        let resolution = world
            .corrector
            .resolve_pair(&mut world.bodies, record.a, record.b);
        if resolution.is_some_and(|resolution| resolution.significant) {
            tags.add(record.a, record.b);
        }
    }
    tags.apply(&mut world.collided_with);
}

pub fn cleanup(world: &mut CollisionWorld) {
    world.collision_entities.clear();
    world.collided_with.clear();
}

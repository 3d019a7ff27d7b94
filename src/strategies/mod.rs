//! The six interchangeable detection and resolution pipelines.
//!
//! Each strategy contributes a handful of [`System`]s to its registry in the
//! [`crate::simulation::SimulationContext`]. Every strategy reports the same
//! pair set for the same bodies; they differ only in where results are stored
//! and how workers share that storage.

pub mod entity;
pub mod non_fragmenting;
pub mod record_list;
pub mod relationship;
pub mod spatial_hash;
pub mod spatial_hash_relationship;

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
    collision::{
        contact::CollisionRecord,
        relation::{CommandBuffer, RelationCommand, RelationGraph},
        resolution::PositionCorrector,
    },
    core::body::Body,
    simulation::System,
    utils::allocator::{Arena, EntityId},
    world::CollisionWorld,
};

/// Which pipeline detects and resolves collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionStrategy {
    /// Parallel all-pairs scan tagging bodies through deferred commands.
    Relationship,
    /// Parallel all-pairs scan tagging bodies immediately under a lock.
    RelationshipNonFragmenting,
    /// All-pairs scan spawning one record entity per pair.
    EntityPerCollision,
    /// Parallel all-pairs scan into the shared record list.
    RecordList,
    /// Grid scan into the shared record list.
    SpatialHash,
    /// Grid scan tagging bodies through deferred commands.
    SpatialHashRelationship,
}

impl CollisionStrategy {
    pub const ALL: [CollisionStrategy; 6] = [
        CollisionStrategy::Relationship,
        CollisionStrategy::RelationshipNonFragmenting,
        CollisionStrategy::EntityPerCollision,
        CollisionStrategy::RecordList,
        CollisionStrategy::SpatialHash,
        CollisionStrategy::SpatialHashRelationship,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CollisionStrategy::Relationship => "collision-relationship",
            CollisionStrategy::RelationshipNonFragmenting => "collision-relationship-dontfragment",
            CollisionStrategy::EntityPerCollision => "collision-entity",
            CollisionStrategy::RecordList => "record-list",
            CollisionStrategy::SpatialHash => "spatial-hash",
            CollisionStrategy::SpatialHashRelationship => "spatial-hash-relationship",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|strategy| strategy.name() == name)
    }

    pub fn uses_grid(self) -> bool {
        matches!(
            self,
            CollisionStrategy::SpatialHash | CollisionStrategy::SpatialHashRelationship
        )
    }

    /// Systems this strategy owns, all initially disabled.
    pub fn systems(self) -> Vec<System> {
        match self {
            CollisionStrategy::Relationship => relationship::systems(),
            CollisionStrategy::RelationshipNonFragmenting => non_fragmenting::systems(),
            CollisionStrategy::EntityPerCollision => entity::systems(),
            CollisionStrategy::RecordList => record_list::systems(),
            CollisionStrategy::SpatialHash => spatial_hash::systems(),
            CollisionStrategy::SpatialHashRelationship => spatial_hash_relationship::systems(),
        }
    }

    /// Pairs found by the last detection phase, canonical and sorted.
    ///
    /// Meaningful between detection and resolution; the relationship
    /// strategies prune their tags while resolving.
    pub fn detected_pairs(self, world: &CollisionWorld) -> Vec<(EntityId, EntityId)> {
        match self {
            CollisionStrategy::Relationship | CollisionStrategy::SpatialHashRelationship => {
                world.collided_with.pairs()
            }
            CollisionStrategy::RelationshipNonFragmenting => world.non_fragmenting.lock().pairs(),
            CollisionStrategy::EntityPerCollision => {
                let mut pairs: Vec<_> = world
                    .collision_entities
                    .values()
                    .map(CollisionRecord::pair)
                    .collect();
                pairs.sort_unstable();
                pairs
            }
            CollisionStrategy::RecordList | CollisionStrategy::SpatialHash => {
                sorted(world.record_list.lock().pairs())
            }
        }
    }

    /// Pairs surfaced to gameplay by the last resolution phase.
    pub fn significant_pairs(self, world: &CollisionWorld) -> Vec<(EntityId, EntityId)> {
        match self {
            CollisionStrategy::Relationship
            | CollisionStrategy::EntityPerCollision
            | CollisionStrategy::SpatialHashRelationship => world.collided_with.pairs(),
            CollisionStrategy::RelationshipNonFragmenting => world.non_fragmenting.lock().pairs(),
            CollisionStrategy::RecordList | CollisionStrategy::SpatialHash => {
                sorted(world.record_list.lock().significant_pairs())
            }
        }
    }
}

impl fmt::Display for CollisionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sorted(mut pairs: Vec<(EntityId, EntityId)>) -> Vec<(EntityId, EntityId)> {
    pairs.sort_unstable();
    pairs
}

/// Sink handed to the pair scans.
pub(crate) type RecordSink<'a> = &'a (dyn Fn(Vec<CollisionRecord>) + Sync);

/// Runs `scan` and turns each worker's records into an "add" command buffer.
///
/// Nothing touches the graph until the caller applies the buffers after the
/// scan has joined.
pub(crate) fn deferred_tags<F>(scan: F) -> Vec<CommandBuffer>
where
    F: FnOnce(RecordSink<'_>),
{
    let pending = Mutex::new(Vec::new());
    scan(&|local: Vec<CollisionRecord>| {
        let mut buffer = CommandBuffer::new();
        buffer.extend(
            local
                .into_iter()
                .map(|record| RelationCommand::Add(record.a, record.b)),
        );
        pending.lock().push(buffer);
    });
    pending.into_inner()
}

/// Re-tests every tagged pair once, correcting overlap. Tags whose pair no
/// longer overlaps or is not significant are dropped. Returns how many remain.
pub(crate) fn resolve_tagged(
    graph: &mut RelationGraph,
    bodies: &mut Arena<Body>,
    corrector: &PositionCorrector,
) -> usize {
    let mut untag = CommandBuffer::new();
    for (a, b) in graph.pairs() {
        match corrector.resolve_pair(bodies, a, b) {
            Some(resolution) if resolution.significant => {}
            _ => untag.remove(a, b),
        }
    }
    untag.apply(graph);
    graph.pair_count()
}

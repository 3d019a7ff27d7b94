use crate::{
    collision::narrowphase::Contact,
    core::{
        collider::{Collider, CollisionCategory},
        types::CollisionInfo,
    },
    utils::allocator::EntityId,
};

/// A detected pair, stored with the lower id first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRecord {
    pub a: EntityId,
    pub b: EntityId,
    pub info_a: CollisionInfo,
    pub info_b: CollisionInfo,
}

impl CollisionRecord {
    /// Builds a canonical record; the contact is oriented from `first` to `second`.
    pub fn new(first: EntityId, second: EntityId, contact: &Contact) -> Self {
        debug_assert_ne!(first, second, "self pairs never collide");
        if first < second {
            Self {
                a: first,
                b: second,
                info_a: contact.info_a,
                info_b: contact.info_b,
            }
        } else {
            Self {
                a: second,
                b: first,
                info_a: contact.info_b,
                info_b: contact.info_a,
            }
        }
    }

    pub fn pair(&self) -> (EntityId, EntityId) {
        (self.a, self.b)
    }
}

/// Whether a pair should surface to gameplay.
///
/// Cross-category pairs are significant, except enemy vs environment.
pub fn is_significant(type_a: CollisionCategory, type_b: CollisionCategory) -> bool {
    (type_a & type_b).is_empty()
        && (type_a | type_b) != (CollisionCategory::ENEMY | CollisionCategory::ENVIRONMENT)
}

pub fn is_significant_pair(a: &Collider, b: &Collider) -> bool {
    is_significant(a.collision_type, b.collision_type)
}

/// Tick-scoped accumulator shared by the record-list and spatial hash strategies.
#[derive(Debug, Default, Clone)]
pub struct CollisionRecordList {
    /// Every pair detected this tick.
    pub records: Vec<CollisionRecord>,
    /// Subset of `records` meant for gameplay.
    pub significant_collisions: Vec<CollisionRecord>,
    /// Contact info refreshed by the first resolution pass, one entry per confirmed pair.
    pub collisions_info: Vec<(EntityId, EntityId, CollisionInfo, CollisionInfo)>,
}

impl CollisionRecordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.significant_collisions.clear();
        self.collisions_info.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
            && self.significant_collisions.is_empty()
            && self.collisions_info.is_empty()
    }

    /// Appends a worker's local buffer.
    pub fn merge(&mut self, mut local: Vec<CollisionRecord>) {
        self.records.append(&mut local);
    }

    pub fn pairs(&self) -> Vec<(EntityId, EntityId)> {
        self.records.iter().map(CollisionRecord::pair).collect()
    }

    pub fn significant_pairs(&self) -> Vec<(EntityId, EntityId)> {
        self.significant_collisions
            .iter()
            .map(CollisionRecord::pair)
            .collect()
    }
}

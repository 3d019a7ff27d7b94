//! Collision detection and resolution: narrow phase, pair discovery, the
//! spatial hashing grid, relation graphs and the position corrector.

pub mod broadphase;
pub mod contact;
pub mod grid;
pub mod narrowphase;
pub mod relation;
pub mod resolution;

pub use contact::{is_significant, CollisionRecord, CollisionRecordList};
pub use grid::{Cell, SpatialHashingGrid, TraversalMode};
pub use narrowphase::{Contact, NarrowPhase};
pub use relation::{CommandBuffer, RelationCommand, RelationGraph};
pub use resolution::{solve_records, PositionCorrector};

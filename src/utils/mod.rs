//! Utility helpers: the generational allocator, math, logging and profiling.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;

pub use allocator::{Arena, EntityId, GenerationalId};
pub use math::*;
pub use profiling::PhaseProfiler;

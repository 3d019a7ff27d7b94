use thiserror::Error;

/// Reasons an [`crate::EngineConfig`] is refused.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("tick length must be positive, got {0}")]
    InvalidTickLength(f32),
    #[error("grid cell size must be positive, got {0}")]
    InvalidCellSize(f32),
    #[error("grid offset must be finite, got {0}")]
    InvalidGridOffset(glam::Vec2),
    #[error("the record solver needs at least one pass")]
    ZeroSolverPasses,
    #[error("correction damping must lie in [0, 1], got {0}")]
    InvalidDamping(f32),
}

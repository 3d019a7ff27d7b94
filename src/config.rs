//! Global configuration constants and the runtime [`EngineConfig`] for Horde Collision.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fixed simulation tick length (in seconds).
pub const PHYSICS_TICK_LENGTH: f32 = 0.016;

/// Default world units per spatial hashing cell.
///
/// Must be at least the largest collider extent, otherwise overlapping bodies
/// two cells apart are never tested.
pub const DEFAULT_CELL_SIZE: f32 = 32.0;

/// Number of passes the iterative record solver performs per tick.
pub const DEFAULT_SOLVER_PASSES: u32 = 3;

/// Fraction of the overlap applied per correction to avoid overshoot.
pub const DEFAULT_CORRECTION_DAMPING: f32 = 0.75;

/// Distance substituted when a circle centre sits exactly on a box corner.
pub const CORNER_EPSILON: f32 = 0.01;

/// Frame budget used to warn about slow ticks (in milliseconds).
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 16.0;

/// Number of frames averaged by the recorder's FPS estimate.
pub const FPS_WINDOW: usize = 60;

/// Runtime configuration of a [`crate::CollisionEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds simulated by a single tick.
    pub tick_length: f32,
    /// World units per grid cell.
    pub cell_size: f32,
    /// World-space origin of the grid.
    pub grid_offset: Vec2,
    /// Passes of the iterative record solver.
    pub solver_passes: u32,
    /// Fraction of the overlap applied by the position corrector.
    pub correction_damping: f32,
    /// Whether detection and movement fan out over the rayon pool.
    pub parallel: bool,
    /// Budget after which a tick is reported as slow.
    pub frame_budget_ms: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_length: PHYSICS_TICK_LENGTH,
            cell_size: DEFAULT_CELL_SIZE,
            grid_offset: Vec2::ZERO,
            solver_passes: DEFAULT_SOLVER_PASSES,
            correction_damping: DEFAULT_CORRECTION_DAMPING,
            parallel: cfg!(feature = "parallel"),
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick_length(mut self, tick_length: f32) -> Self {
        self.tick_length = tick_length;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_grid_offset(mut self, offset: Vec2) -> Self {
        self.grid_offset = offset;
        self
    }

    pub fn with_solver_passes(mut self, passes: u32) -> Self {
        self.solver_passes = passes;
        self
    }

    pub fn with_correction_damping(mut self, damping: f32) -> Self {
        self.correction_damping = damping;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_frame_budget_ms(mut self, budget: f32) -> Self {
        self.frame_budget_ms = budget;
        self
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_length > 0.0) {
            return Err(ConfigError::InvalidTickLength(self.tick_length));
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !self.grid_offset.is_finite() {
            return Err(ConfigError::InvalidGridOffset(self.grid_offset));
        }
        if self.solver_passes == 0 {
            return Err(ConfigError::ZeroSolverPasses);
        }
        if !(0.0..=1.0).contains(&self.correction_damping) {
            return Err(ConfigError::InvalidDamping(self.correction_damping));
        }
        Ok(())
    }
}

//! Horde Collision – 2D collision detection for large crowds of bodies.
//!
//! The crate provides circle/box narrow phase, a position corrector, a sparse
//! spatial hashing grid and six interchangeable detection strategies that
//! report the same collisions through different storage layouts. One
//! [`CollisionEngine`] owns the bodies and a [`SimulationContext`] selecting
//! the active strategy.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod perf;
pub mod simulation;
pub mod strategies;
pub mod utils;
pub mod world;

use std::time::Instant;

pub use glam::Vec2;

pub use collision::{
    contact::{CollisionRecord, CollisionRecordList},
    grid::{SpatialHashingGrid, TraversalMode},
    narrowphase::{Contact, NarrowPhase},
    resolution::PositionCorrector,
};
pub use config::EngineConfig;
pub use self::core::{
    body::{Body, BodyBuilder},
    collider::{Collider, ColliderShape, CollisionCategory, ShapeKind},
    types::{CollisionInfo, Rect},
};
pub use error::ConfigError;
pub use perf::{CounterSource, FrameSample, NoCounters, PerfRecorder};
pub use simulation::{Phase, SimulationContext, System};
pub use strategies::CollisionStrategy;
pub use utils::{
    allocator::{Arena, EntityId, GenerationalId},
    logging::warn_if_frame_budget_exceeded,
    profiling::{PhaseProfiler, ScopedTimer},
};
pub use world::CollisionWorld;

/// Counts produced by one [`CollisionEngine::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub detected_pairs: usize,
    pub significant_pairs: usize,
}

/// High-level wrapper owning a [`CollisionWorld`] and its strategy selector.
pub struct CollisionEngine {
    world: CollisionWorld,
    context: SimulationContext,
    profiler: PhaseProfiler,
    time_accumulated: f32,
}

impl CollisionEngine {
    /// Validates `config` and creates an engine with every strategy registered
    /// but none selected.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut context = SimulationContext::new();
        context.register_default_systems();
        Ok(Self {
            world: CollisionWorld::new(config),
            context,
            profiler: PhaseProfiler::default(),
            time_accumulated: 0.0,
        })
    }

    /// Activates `strategy`. Leftover collision state from the previous
    /// strategy is dropped; a grid strategy starts from an empty grid that is
    /// rebuilt before the next update.
    pub fn set_collision_strategy(&mut self, strategy: CollisionStrategy) {
        self.world.clear_collision_state();
        if strategy.uses_grid() {
            self.world.grid.clear();
        }
        self.context.set_strategy(strategy);
    }

    pub fn active_strategy(&self) -> Option<CollisionStrategy> {
        self.context.active_strategy()
    }

    /// Rebuilds every strategy registry from scratch; no strategy is active afterwards.
    pub fn reset_systems_list(&mut self) {
        self.context.reset_systems_list();
        self.context.register_default_systems();
        self.world.clear_collision_state();
        self.world.grid.clear();
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.context
    }

    pub fn add_body(&mut self, body: Body) -> EntityId {
        self.world.add_body(body)
    }

    pub fn remove_body(&mut self, id: EntityId) -> Option<Body> {
        self.world.remove_body(id)
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.world.body(id)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.world.body_mut(id)
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut CollisionWorld {
        &mut self.world
    }

    pub fn profiler(&self) -> &PhaseProfiler {
        &self.profiler
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.world.set_parallel(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.world.parallel()
    }

    /// Brings strategy state in line with moved bodies (grid membership).
    pub fn on_bodies_moved(&mut self) {
        let _timer = ScopedTimer::new(&mut self.profiler.update_time);
        if self.context.take_start_pending() {
            self.context.run_phase(Phase::OnStart, &mut self.world);
        }
        self.context.run_phase(Phase::UpdateBodies, &mut self.world);
    }

    pub fn run_detection(&mut self) {
        {
            let _timer = ScopedTimer::new(&mut self.profiler.detection_time);
            self.context.run_phase(Phase::Detection, &mut self.world);
        }
        self.profiler.detected_pairs = self.detected_pairs().len();
    }

    pub fn run_resolution(&mut self) {
        {
            let _timer = ScopedTimer::new(&mut self.profiler.resolution_time);
            self.context.run_phase(Phase::Resolution, &mut self.world);
        }
        self.profiler.significant_pairs = self.significant_pairs().len();
    }

    pub fn run_cleanup(&mut self) {
        let _timer = ScopedTimer::new(&mut self.profiler.cleanup_time);
        self.context.run_phase(Phase::Cleanup, &mut self.world);
    }

    /// Moves bodies, then runs every collision phase once.
    pub fn tick(&mut self) -> TickSummary {
        let started = Instant::now();
        self.profiler.reset();
        self.profiler.body_count = self.world.body_count();

        {
            let _timer = ScopedTimer::new(&mut self.profiler.update_time);
            self.world.integrate();
        }
        self.on_bodies_moved();
        self.run_detection();
        self.run_resolution();
        self.run_cleanup();

        if let Some(strategy) = self.context.active_strategy() {
            warn_if_frame_budget_exceeded(
                strategy.name(),
                started.elapsed(),
                self.world.config().frame_budget_ms,
            );
        }
        TickSummary {
            detected_pairs: self.profiler.detected_pairs,
            significant_pairs: self.profiler.significant_pairs,
        }
    }

    /// Advances by `dt` seconds in fixed ticks. Returns how many ticks ran.
    pub fn step(&mut self, dt: f32) -> u32 {
        let tick_length = self.world.config().tick_length;
        self.time_accumulated += dt;

        let mut ticks = 0;
        while self.time_accumulated >= tick_length {
            self.time_accumulated -= tick_length;
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Pairs found by the last detection phase; empty when no strategy is active.
    pub fn detected_pairs(&self) -> Vec<(EntityId, EntityId)> {
        self.context
            .active_strategy()
            .map(|strategy| strategy.detected_pairs(&self.world))
            .unwrap_or_default()
    }

    /// Pairs surfaced to gameplay by the last resolution phase.
    pub fn significant_pairs(&self) -> Vec<(EntityId, EntityId)> {
        self.context
            .active_strategy()
            .map(|strategy| strategy.significant_pairs(&self.world))
            .unwrap_or_default()
    }
}

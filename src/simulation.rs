//! Strategy selection.
//!
//! A [`SimulationContext`] owns one registry of systems per strategy. Exactly
//! one registry is enabled at a time; the others stay registered but never run.

use std::fmt;

use crate::{strategies::CollisionStrategy, world::CollisionWorld};

/// Ordered stages of a tick. A phase finishes, including any parallel work it
/// spawned, before the next one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Runs once before the first tick after a strategy is selected.
    OnStart,
    UpdateBodies,
    Detection,
    Resolution,
    Cleanup,
}

pub type SystemFn = fn(&mut CollisionWorld);

/// A named step of one strategy's pipeline.
#[derive(Clone)]
pub struct System {
    pub name: &'static str,
    pub phase: Phase,
    pub run: SystemFn,
    pub enabled: bool,
}

impl System {
    /// New systems start disabled.
    pub fn new(name: &'static str, phase: Phase, run: SystemFn) -> Self {
        Self {
            name,
            phase,
            run,
            enabled: false,
        }
    }
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Systems owned by one strategy.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    pub strategy: CollisionStrategy,
    systems: Vec<System>,
}

impl StrategyRegistry {
    pub fn new(strategy: CollisionStrategy) -> Self {
        Self {
            strategy,
            systems: Vec::new(),
        }
    }

    pub fn register(&mut self, system: System) {
        self.systems.push(system);
    }

    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    fn set_enabled(&mut self, enabled: bool) {
        for system in &mut self.systems {
            system.enabled = enabled;
        }
    }
}

/// Caller-owned strategy selector.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    registries: Vec<StrategyRegistry>,
    active: Option<CollisionStrategy>,
    start_pending: bool,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationContext {
    /// Context with one empty registry per strategy and nothing selected.
    pub fn new() -> Self {
        Self {
            registries: CollisionStrategy::ALL
                .into_iter()
                .map(StrategyRegistry::new)
                .collect(),
            active: None,
            start_pending: false,
        }
    }

    /// Drops every strategy-owned system and starts over with empty registries.
    pub fn reset_systems_list(&mut self) {
        *self = Self::new();
    }

    /// Fills each registry with its strategy's systems, all disabled.
    pub fn register_default_systems(&mut self) {
        for registry in &mut self.registries {
            for system in registry.strategy.systems() {
                registry.register(system);
            }
        }
    }

    /// Adds a system to `strategy`'s registry. It is enabled only while that
    /// strategy is active.
    pub fn register_system(&mut self, strategy: CollisionStrategy, mut system: System) {
        system.enabled = self.active == Some(strategy);
        self.registry_mut(strategy).register(system);
    }

    /// Enables `strategy`'s systems and disables every other registry.
    /// Returns the previously active strategy.
    pub fn set_strategy(&mut self, strategy: CollisionStrategy) -> Option<CollisionStrategy> {
        for registry in &mut self.registries {
            registry.set_enabled(registry.strategy == strategy);
        }
        self.start_pending = true;
        log::debug!("collision strategy set to {strategy}");
        self.active.replace(strategy)
    }

    pub fn active_strategy(&self) -> Option<CollisionStrategy> {
        self.active
    }

    pub fn registry(&self, strategy: CollisionStrategy) -> &StrategyRegistry {
        &self.registries[Self::slot(strategy)]
    }

    fn registry_mut(&mut self, strategy: CollisionStrategy) -> &mut StrategyRegistry {
        &mut self.registries[Self::slot(strategy)]
    }

    fn slot(strategy: CollisionStrategy) -> usize {
        strategy as usize
    }

    pub fn system_count(&self) -> usize {
        self.registries.iter().map(StrategyRegistry::len).sum()
    }

    pub fn enabled_systems(&self) -> impl Iterator<Item = &System> + '_ {
        self.registries
            .iter()
            .flat_map(|registry| registry.systems.iter())
            .filter(|system| system.enabled)
    }

    /// Whether the on-start systems still have to run for the current strategy.
    pub fn take_start_pending(&mut self) -> bool {
        std::mem::take(&mut self.start_pending)
    }

    /// Runs every enabled system of `phase` in registration order. Returns how many ran.
    pub fn run_phase(&self, phase: Phase, world: &mut CollisionWorld) -> usize {
        let mut ran = 0;
        for system in self.enabled_systems().filter(|system| system.phase == phase) {
            log::trace!("running {}", system.name);
            (system.run)(world);
            ran += 1;
        }
        ran
    }
}

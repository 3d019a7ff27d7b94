use glam::Vec2;
use parking_lot::Mutex;

use crate::{
    collision::{
        broadphase,
        contact::{CollisionRecord, CollisionRecordList},
        grid::SpatialHashingGrid,
        relation::RelationGraph,
        resolution::PositionCorrector,
    },
    config::EngineConfig,
    core::body::Body,
    error::ConfigError,
    dynamics::integrator::Integrator,
    utils::{
        allocator::{Arena, EntityId},
        logging::SystemTimer,
    },
};

/// Bodies plus every piece of collision state the strategies write to.
///
/// Only the active strategy touches its own stores; all of them are emptied
/// by cleanup and whenever the strategy changes.
pub struct CollisionWorld {
    pub bodies: Arena<Body>,
    /// Shared by the record-list and spatial hash strategies.
    pub record_list: Mutex<CollisionRecordList>,
    pub grid: SpatialHashingGrid,
    /// "Collided with" tags written through deferred command buffers.
    pub collided_with: RelationGraph,
    /// Tags the non-fragmenting strategy writes straight from its workers.
    pub non_fragmenting: Mutex<RelationGraph>,
    /// One record entity per detected pair under the entity-per-collision strategy.
    pub collision_entities: Arena<CollisionRecord>,
    pub corrector: PositionCorrector,
    pub integrator: Integrator,
    config: EngineConfig,
}

impl CollisionWorld {
    pub fn new(config: EngineConfig) -> Self {
        let mut integrator = Integrator::new(config.tick_length);
        integrator.set_parallel(config.parallel);

        Self {
            bodies: Arena::new(),
            record_list: Mutex::new(CollisionRecordList::new()),
            grid: SpatialHashingGrid::new(config.cell_size, config.grid_offset),
            collided_with: RelationGraph::new(),
            non_fragmenting: Mutex::new(RelationGraph::new()),
            collision_entities: Arena::new(),
            corrector: PositionCorrector::new(config.correction_damping),
            integrator,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parallel(&self) -> bool {
        self.config.parallel
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.config.parallel = enabled;
        self.integrator.set_parallel(enabled);
    }

    pub fn solver_passes(&self) -> u32 {
        self.config.solver_passes
    }

    /// Stores `body` and stamps it with its id.
    pub fn add_body(&mut self, body: Body) -> EntityId {
        if body.collider.max_extent() > self.grid.cell_size() && !body.is_static() {
            log::warn!(
                "collider extent {} exceeds grid cell size {}; grid strategies may miss pairs",
                body.collider.max_extent(),
                self.grid.cell_size()
            );
        }
        self.bodies.insert_with(|id| Body { id, ..body })
    }

    /// Removes a body and every tag or record entity that mentions it.
    pub fn remove_body(&mut self, id: EntityId) -> Option<Body> {
        let body = self.bodies.remove(id)?;
        self.collided_with.remove_all_for(id);
        self.non_fragmenting.get_mut().remove_all_for(id);

        let stale: Vec<EntityId> = self
            .collision_entities
            .iter()
            .filter(|(_, record)| record.a == id || record.b == id)
            .map(|(entity, _)| entity)
            .collect();
        for entity in stale {
            self.collision_entities.remove(entity);
        }
        Some(body)
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn participants(&self) -> Vec<&Body> {
        broadphase::participants(&self.bodies)
    }

    /// Moves every body by one tick.
    pub fn integrate(&mut self) {
        let _timer = SystemTimer::new("bodies::integrate");
        self.integrator.step(&mut self.bodies);
    }

    /// Viewport change: the grid is rebuilt on its next update.
    pub fn recenter_grid(&mut self, offset: Vec2) -> Result<(), ConfigError> {
        EngineConfig {
            grid_offset: offset,
            ..self.config
        }
        .validate()?;
        self.grid.recenter(offset);
        self.config.grid_offset = offset;
        Ok(())
    }

    /// Changes the grid cell size, rejecting what [`EngineConfig::validate`] rejects.
    pub fn set_cell_size(&mut self, cell_size: f32) -> Result<(), ConfigError> {
        EngineConfig {
            cell_size,
            ..self.config
        }
        .validate()?;
        self.grid.resize(cell_size);
        self.config.cell_size = cell_size;
        Ok(())
    }

    /// Empties the record list, both relation graphs and the record entities.
    pub fn clear_collision_state(&mut self) {
        self.record_list.get_mut().clear();
        self.collided_with.clear();
        self.non_fragmenting.get_mut().clear();
        self.collision_entities.clear();
    }

    /// Whether any tick-scoped collision state is left over.
    pub fn has_collision_state(&self) -> bool {
        !self.record_list.lock().is_empty()
            || !self.collided_with.is_empty()
            || !self.non_fragmenting.lock().is_empty()
            || !self.collision_entities.is_empty()
    }

    /// Total "collided with" tags across both relation graphs.
    pub fn tag_count(&self) -> usize {
        self.collided_with.tag_count() + self.non_fragmenting.lock().tag_count()
    }
}

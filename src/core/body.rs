use crate::utils::allocator::EntityId;

use super::collider::Collider;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A moving (or static) collision body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Velocity the body steers towards.
    pub desired_velocity: Vec2,
    /// How fast `velocity` approaches `desired_velocity`, per second.
    pub acceleration_speed: f32,
    /// Off-screen bodies are skipped by detection unless they are static.
    pub visible: bool,
    pub collider: Collider,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            id: EntityId::default(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            desired_velocity: Vec2::ZERO,
            acceleration_speed: 10.0,
            visible: true,
            collider: Collider::default(),
        }
    }
}

impl Body {
    pub fn new(position: Vec2, collider: Collider) -> Self {
        Self {
            position,
            collider,
            ..Self::default()
        }
    }

    pub fn builder() -> BodyBuilder {
        BodyBuilder::default()
    }

    pub fn is_static(&self) -> bool {
        self.collider.static_body
    }

    /// Whether detection considers this body at all.
    pub fn participates(&self) -> bool {
        self.visible || self.collider.static_body
    }

    /// Point the spatial hashing grid files this body under.
    pub fn shape_centre(&self) -> Vec2 {
        self.collider.shape_centre(self.position)
    }

    /// Whether the spatial hashing grid tracks this body.
    pub fn is_grid_tracked(&self) -> bool {
        self.visible && !self.collider.static_body
    }
}

#[derive(Default)]
pub struct BodyBuilder {
    body: Body,
}

impl BodyBuilder {
    pub fn position(mut self, position: Vec2) -> Self {
        self.body.position = position;
        self
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.body.velocity = velocity;
        self
    }

    pub fn desired_velocity(mut self, desired: Vec2) -> Self {
        self.body.desired_velocity = desired;
        self
    }

    pub fn acceleration_speed(mut self, speed: f32) -> Self {
        self.body.acceleration_speed = speed;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.body.visible = visible;
        self
    }

    pub fn collider(mut self, collider: Collider) -> Self {
        self.body.collider = collider;
        self
    }

    pub fn build(self) -> Body {
        self.body
    }
}

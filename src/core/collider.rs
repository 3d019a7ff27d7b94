use super::types::Rect;
use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Gameplay categories a collider can belong to or collide with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CollisionCategory: u32 {
        const PLAYER = 1;
        const ENEMY = 1 << 1;
        const ENVIRONMENT = 1 << 2;
    }
}

impl CollisionCategory {
    pub const NONE: CollisionCategory = CollisionCategory::empty();

    /// What the player collides with.
    pub const PLAYER_FILTER: CollisionCategory =
        CollisionCategory::ENEMY.union(CollisionCategory::ENVIRONMENT);

    /// What enemies collide with.
    pub const ENEMY_FILTER: CollisionCategory = CollisionCategory::PLAYER
        .union(CollisionCategory::ENEMY)
        .union(CollisionCategory::ENVIRONMENT);

    /// What walls and obstacles collide with.
    pub const ENVIRONMENT_FILTER: CollisionCategory =
        CollisionCategory::PLAYER.union(CollisionCategory::ENEMY);
}

/// Shape discriminant used to index the narrow-phase dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle = 0,
    Box = 1,
}

impl ShapeKind {
    pub const COUNT: usize = 2;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Collider geometry. Boxes use the collider bounds directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Circle { radius: f32 },
    Box,
}

impl ColliderShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ColliderShape::Circle { .. } => ShapeKind::Circle,
            ColliderShape::Box => ShapeKind::Box,
        }
    }
}

/// Collision descriptor attached to every body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Bounding rectangle relative to the body position.
    pub bounds: Rect,
    pub shape: ColliderShape,
    /// Static bodies never move and are never corrected.
    pub static_body: bool,
    /// Movable bodies with this unset act as triggers: they detect but never push.
    pub correct_position: bool,
    /// Category this collider is.
    pub collision_type: CollisionCategory,
    /// Categories this collider can collide with.
    pub collision_filter: CollisionCategory,
}

impl Default for Collider {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Collider {
    pub fn builder() -> ColliderBuilder {
        ColliderBuilder::new()
    }

    /// Circle collider with bounds hugging the circle.
    pub fn circle(radius: f32) -> ColliderBuilder {
        ColliderBuilder::new().circle(radius)
    }

    /// Box collider centred on the body position.
    pub fn rect(width: f32, height: f32) -> ColliderBuilder {
        ColliderBuilder::new().box_shape(Rect::centered(width, height))
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn radius(&self) -> Option<f32> {
        match self.shape {
            ColliderShape::Circle { radius } => Some(radius),
            ColliderShape::Box => None,
        }
    }

    /// Bounds in world space for a body at `position`.
    pub fn world_bounds(&self, position: Vec2) -> Rect {
        self.bounds.translated(position)
    }

    /// World-space rectangle the narrow phase actually tests for a body at
    /// `position`. Circles are centred on the position whatever their bounds
    /// say; boxes are their translated bounds.
    pub fn shape_bounds(&self, position: Vec2) -> Rect {
        match self.shape {
            ColliderShape::Circle { radius } => {
                Rect::centered(radius * 2.0, radius * 2.0).translated(position)
            }
            ColliderShape::Box => self.world_bounds(position),
        }
    }

    /// Centre of [`Self::shape_bounds`]; the grid files bodies under this point.
    pub fn shape_centre(&self, position: Vec2) -> Vec2 {
        self.shape_bounds(position).center()
    }

    /// Largest side of the tested shape, used to sanity check the grid cell size.
    pub fn max_extent(&self) -> f32 {
        let shape = self.shape_bounds(Vec2::ZERO);
        shape.width.max(shape.height)
    }

    /// Directional filter test: can `self` collide with what `other` is.
    pub fn accepts(&self, other: &Collider) -> bool {
        self.collision_filter.intersects(other.collision_type)
    }
}

pub struct ColliderBuilder {
    bounds: Rect,
    shape: ColliderShape,
    static_body: bool,
    correct_position: bool,
    collision_type: CollisionCategory,
    collision_filter: CollisionCategory,
}

impl Default for ColliderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ColliderBuilder {
    pub fn new() -> Self {
        Self {
            bounds: Rect::centered(32.0, 32.0),
            shape: ColliderShape::Circle { radius: 16.0 },
            static_body: false,
            correct_position: true,
            collision_type: CollisionCategory::ENEMY,
            collision_filter: CollisionCategory::ENEMY_FILTER,
        }
    }

    pub fn circle(mut self, radius: f32) -> Self {
        self.shape = ColliderShape::Circle { radius };
        self.bounds = Rect::centered(radius * 2.0, radius * 2.0);
        self
    }

    pub fn box_shape(mut self, bounds: Rect) -> Self {
        self.shape = ColliderShape::Box;
        self.bounds = bounds;
        self
    }

    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn static_body(mut self, static_body: bool) -> Self {
        self.static_body = static_body;
        self
    }

    pub fn correct_position(mut self, correct_position: bool) -> Self {
        self.correct_position = correct_position;
        self
    }

    pub fn category(
        mut self,
        collision_type: CollisionCategory,
        collision_filter: CollisionCategory,
    ) -> Self {
        self.collision_type = collision_type;
        self.collision_filter = collision_filter;
        self
    }

    pub fn player(self) -> Self {
        self.category(CollisionCategory::PLAYER, CollisionCategory::PLAYER_FILTER)
    }

    pub fn enemy(self) -> Self {
        self.category(CollisionCategory::ENEMY, CollisionCategory::ENEMY_FILTER)
    }

    /// Environment colliders are static.
    pub fn environment(self) -> Self {
        self.category(
            CollisionCategory::ENVIRONMENT,
            CollisionCategory::ENVIRONMENT_FILTER,
        )
        .static_body(true)
    }

    pub fn build(self) -> Collider {
        Collider {
            bounds: self.bounds,
            shape: self.shape,
            static_body: self.static_body,
            correct_position: self.correct_position,
            collision_type: self.collision_type,
            collision_filter: self.collision_filter,
        }
    }
}

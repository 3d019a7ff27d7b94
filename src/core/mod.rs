//! Core data: bodies, colliders and the small geometric value types they use.

pub mod body;
pub mod collider;
pub mod types;

pub use body::{Body, BodyBuilder};
pub use collider::{Collider, ColliderBuilder, ColliderShape, CollisionCategory, ShapeKind};
pub use types::{CollisionInfo, Rect};

//! Small math helpers layered on top of `glam`.

use glam::Vec2;

/// Moves `current` towards `target` by the fraction `t`, clamped to `[0, 1]`.
pub fn approach(current: Vec2, target: Vec2, t: f32) -> Vec2 {
    current.lerp(target, t.clamp(0.0, 1.0))
}

/// Integer cell coordinate of `position` on a grid anchored at `offset`.
pub fn cell_coord(position: Vec2, offset: Vec2, cell_size: f32) -> (i32, i32) {
    let local = (position - offset) / cell_size;
    (local.x.floor() as i32, local.y.floor() as i32)
}

use glam::Vec2;

use crate::{
    config::CORNER_EPSILON,
    core::{
        collider::{Collider, ShapeKind},
        types::{CollisionInfo, Rect},
    },
};

/// Result of a positive narrow-phase test.
///
/// `overlap` is the minimum translation vector oriented from A towards B:
/// separating the pair means moving A by `-overlap` and B by `+overlap`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub overlap: Vec2,
    pub info_a: CollisionInfo,
    pub info_b: CollisionInfo,
}

impl Contact {
    pub fn depth(&self) -> f32 {
        self.overlap.length()
    }

    /// Same contact seen from the other body.
    pub fn swapped(self) -> Self {
        Self {
            overlap: -self.overlap,
            info_a: self.info_b,
            info_b: self.info_a,
        }
    }
}

/// Circle vs circle. Collides iff the centre distance is below the radius sum.
pub fn test_circle_circle(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> Option<Contact> {
    let combined_radius = radius_a + radius_b;
    let direction = pos_b - pos_a;
    let distance_sq = direction.length_squared();
    if distance_sq >= combined_radius * combined_radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    // coincident centres: push along +X
    let move_dir = direction.try_normalize().unwrap_or(Vec2::X);
    let overlap = move_dir * (combined_radius - distance);
    let contact_point = pos_a + move_dir * radius_a;

    Some(Contact {
        overlap,
        info_a: CollisionInfo::new(-move_dir, contact_point),
        info_b: CollisionInfo::new(move_dir, contact_point),
    })
}

/// Circle (A) vs axis-aligned box (B).
///
/// Side hits resolve along the axis of least overlap; corner hits use the
/// distance to the nearest corner.
pub fn test_circle_box(
    circle_pos: Vec2,
    radius: f32,
    box_center: Vec2,
    half_extents: Vec2,
) -> Option<Contact> {
    let d = circle_pos - box_center;
    let abs_d = d.abs();

    if abs_d.x >= half_extents.x + radius || abs_d.y >= half_extents.y + radius {
        return None;
    }

    let overlap = if abs_d.x <= half_extents.x || abs_d.y <= half_extents.y {
        let overlap_x = (half_extents.x + radius) - abs_d.x;
        let overlap_y = (half_extents.y + radius) - abs_d.y;
        if overlap_x < overlap_y {
            Vec2::new(if d.x < 0.0 { overlap_x } else { -overlap_x }, 0.0)
        } else {
            Vec2::new(0.0, if d.y < 0.0 { overlap_y } else { -overlap_y })
        }
    } else {
        let corner = abs_d - half_extents;
        let corner_dist_sq = corner.length_squared();
        if corner_dist_sq >= radius * radius {
            return None;
        }

        let mut dist = corner_dist_sq.sqrt();
        if dist == 0.0 {
            dist = CORNER_EPSILON;
        }
        let depth = radius - dist;
        let n = corner / dist;
        Vec2::new(
            n.x * depth * if d.x < 0.0 { 1.0 } else { -1.0 },
            n.y * depth * if d.y < 0.0 { 1.0 } else { -1.0 },
        )
    };

    let towards_box = overlap.normalize_or_zero();
    let contact_point = circle_pos + towards_box * radius;
    Some(Contact {
        overlap,
        info_a: CollisionInfo::new(-towards_box, contact_point),
        info_b: CollisionInfo::new(towards_box, contact_point),
    })
}

/// Axis-aligned box vs box, resolved along the axis of least penetration.
pub fn test_box_box(box_a: Rect, box_b: Rect) -> Option<Contact> {
    if !box_a.overlaps(&box_b) {
        return None;
    }

    let d = box_b.center() - box_a.center();
    let combined = box_a.half_extents() + box_b.half_extents();
    let overlap_x = combined.x - d.x.abs();
    let overlap_y = combined.y - d.y.abs();

    let overlap = if overlap_x < overlap_y {
        Vec2::new(if d.x < 0.0 { -overlap_x } else { overlap_x }, 0.0)
    } else {
        Vec2::new(0.0, if d.y < 0.0 { -overlap_y } else { overlap_y })
    };

    let intersection_min = box_a.min().max(box_b.min());
    let intersection_max = box_a.max().min(box_b.max());
    let contact_point = (intersection_min + intersection_max) * 0.5;
    let normal = overlap.normalize_or_zero();

    Some(Contact {
        overlap,
        info_a: CollisionInfo::new(-normal, contact_point),
        info_b: CollisionInfo::new(normal, contact_point),
    })
}

/// Narrow-phase handler for one `(ShapeKind, ShapeKind)` cell of the dispatch table.
pub type PairHandler = fn(Vec2, &Collider, Vec2, &Collider) -> Option<Contact>;

fn circle_circle(pos_a: Vec2, a: &Collider, pos_b: Vec2, b: &Collider) -> Option<Contact> {
    test_circle_circle(pos_a, a.radius()?, pos_b, b.radius()?)
}

fn circle_box(pos_a: Vec2, a: &Collider, pos_b: Vec2, b: &Collider) -> Option<Contact> {
    let bounds = b.world_bounds(pos_b);
    test_circle_box(pos_a, a.radius()?, bounds.center(), bounds.half_extents())
}

fn box_circle(pos_a: Vec2, a: &Collider, pos_b: Vec2, b: &Collider) -> Option<Contact> {
    circle_box(pos_b, b, pos_a, a).map(Contact::swapped)
}

fn box_box(pos_a: Vec2, a: &Collider, pos_b: Vec2, b: &Collider) -> Option<Contact> {
    test_box_box(a.world_bounds(pos_a), b.world_bounds(pos_b))
}

/// Dispatch table indexed by `[kind_a][kind_b]`.
pub const DISPATCH: [[PairHandler; ShapeKind::COUNT]; ShapeKind::COUNT] =
    [[circle_circle, circle_box], [box_circle, box_box]];

/// Narrow-phase entry point used by every strategy.
pub struct NarrowPhase;

impl NarrowPhase {
    pub fn collide(pos_a: Vec2, a: &Collider, pos_b: Vec2, b: &Collider) -> Option<Contact> {
        DISPATCH[a.kind().index()][b.kind().index()](pos_a, a, pos_b, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circles_report_overlap_along_centre_line() {
        let contact = test_circle_circle(Vec2::ZERO, 16.0, Vec2::new(20.0, 0.0), 16.0)
            .expect("distance 20 < 32");

        assert_relative_eq!(contact.overlap.x, 12.0);
        assert_relative_eq!(contact.overlap.y, 0.0);
        assert_eq!(contact.info_a.normal, Vec2::new(-1.0, 0.0));
        assert_eq!(contact.info_b.normal, Vec2::new(1.0, 0.0));
        assert_eq!(contact.info_a.contact_point, Vec2::new(16.0, 0.0));
    }

    #[test]
    fn touching_circles_do_not_collide() {
        assert!(test_circle_circle(Vec2::ZERO, 16.0, Vec2::new(32.0, 0.0), 16.0).is_none());
    }

    #[test]
    fn coincident_circles_pick_a_finite_axis() {
        let contact = test_circle_circle(Vec2::ONE, 4.0, Vec2::ONE, 4.0).expect("same centre");
        assert!(contact.overlap.is_finite());
        assert_relative_eq!(contact.depth(), 8.0);
    }

    #[test]
    fn circle_hits_box_side_on_least_overlap_axis() {
        // circle left of a 48x48 box, slightly above centre
        let contact = test_circle_box(
            Vec2::new(-30.0, -4.0),
            16.0,
            Vec2::ZERO,
            Vec2::splat(24.0),
        )
        .expect("side overlap of 10");

        assert_relative_eq!(contact.overlap.x, 10.0);
        assert_relative_eq!(contact.overlap.y, 0.0);
        assert_eq!(contact.info_a.normal, Vec2::new(-1.0, 0.0));
        assert_eq!(contact.info_b.normal, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn circle_hits_box_corner() {
        let contact = test_circle_box(
            Vec2::new(30.0, 30.0),
            16.0,
            Vec2::ZERO,
            Vec2::splat(24.0),
        )
        .expect("corner distance sqrt(72) < 16");

        let expected_depth = 16.0 - 72.0f32.sqrt();
        assert_relative_eq!(contact.depth(), expected_depth, epsilon = 1e-4);
        // box is pushed away from the circle, towards -x/-y
        assert!(contact.overlap.x < 0.0 && contact.overlap.y < 0.0);
        assert!(contact.info_a.normal.x > 0.0 && contact.info_a.normal.y > 0.0);
    }

    #[test]
    fn circle_near_corner_but_outside_radius_misses() {
        assert!(test_circle_box(Vec2::new(37.0, 37.0), 16.0, Vec2::ZERO, Vec2::splat(24.0)).is_none());
    }

    #[test]
    fn circle_centre_on_corner_stays_finite() {
        let contact = test_circle_box(Vec2::new(24.0, 24.0), 16.0, Vec2::ZERO, Vec2::splat(24.0))
            .expect("centre sits on the corner");
        assert!(contact.overlap.is_finite());
    }

    #[test]
    fn far_circle_misses_box() {
        assert!(test_circle_box(Vec2::ZERO, 16.0, Vec2::new(100.0, 100.0), Vec2::splat(24.0)).is_none());
    }

    #[test]
    fn boxes_resolve_along_shallow_axis() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(8.0, 1.0, 10.0, 10.0);
        let contact = test_box_box(a, b).expect("2 units of x overlap");

        assert_relative_eq!(contact.overlap.x, 2.0);
        assert_relative_eq!(contact.overlap.y, 0.0);
        assert_eq!(contact.info_b.normal, Vec2::X);
        assert_eq!(contact.info_a.contact_point, Vec2::new(9.0, 5.5));
    }

    #[test]
    fn edge_touching_boxes_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(test_box_box(a, b).is_none());
    }

    #[test]
    fn dispatch_swaps_box_circle_results() {
        let circle = Collider::circle(16.0).build();
        let wall = Collider::rect(48.0, 48.0).build();
        let circle_pos = Vec2::new(-30.0, 0.0);

        let circle_first = NarrowPhase::collide(circle_pos, &circle, Vec2::ZERO, &wall)
            .expect("circle vs box");
        let box_first = NarrowPhase::collide(Vec2::ZERO, &wall, circle_pos, &circle)
            .expect("box vs circle");

        assert_eq!(box_first.overlap, -circle_first.overlap);
        assert_eq!(box_first.info_a, circle_first.info_b);
        assert_eq!(box_first.info_b, circle_first.info_a);
    }
}

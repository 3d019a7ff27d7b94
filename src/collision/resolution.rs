use glam::Vec2;

use crate::{
    collision::{
        contact::{is_significant_pair, CollisionRecord, CollisionRecordList},
        narrowphase::{Contact, NarrowPhase},
    },
    config::DEFAULT_CORRECTION_DAMPING,
    core::{body::Body, collider::Collider},
    utils::allocator::{Arena, EntityId},
};

/// Pushes overlapping bodies apart according to their static / trigger flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionCorrector {
    /// Fraction of the overlap applied per correction.
    pub damping: f32,
}

impl Default for PositionCorrector {
    fn default() -> Self {
        Self::new(DEFAULT_CORRECTION_DAMPING)
    }
}

impl PositionCorrector {
    pub fn new(damping: f32) -> Self {
        Self { damping }
    }

    /// Share of the overlap each body absorbs.
    ///
    /// Static bodies take none. A movable body with `correct_position` unset
    /// freezes the whole pair, so triggers detect without pushing.
    pub fn move_ratios(a: &Collider, b: &Collider) -> (f32, f32) {
        let trigger = |c: &Collider| !c.correct_position && !c.static_body;
        if trigger(a) || trigger(b) {
            return (0.0, 0.0);
        }

        match (a.static_body, b.static_body) {
            (true, true) => (0.0, 0.0),
            (true, false) => (0.0, 1.0),
            (false, true) => (1.0, 0.0),
            (false, false) => (0.5, 0.5),
        }
    }

    /// Moves `a` by `-overlap * ratio_a * damping` and `b` by `+overlap * ratio_b * damping`.
    pub fn correct_positions(&self, a: &mut Body, b: &mut Body, overlap: Vec2) {
        let (ratio_a, ratio_b) = Self::move_ratios(&a.collider, &b.collider);
        if ratio_a > 0.0 {
            a.position -= overlap * ratio_a * self.damping;
        }
        if ratio_b > 0.0 {
            b.position += overlap * ratio_b * self.damping;
        }
    }

    /// Re-tests the pair at the bodies' current positions and corrects it.
    pub fn resolve_pair(
        &self,
        bodies: &mut Arena<Body>,
        a: EntityId,
        b: EntityId,
    ) -> Option<PairResolution> {
        let (body_a, body_b) = bodies.get2_mut(a, b)?;
        let contact = NarrowPhase::collide(
            body_a.position,
            &body_a.collider,
            body_b.position,
            &body_b.collider,
        )?;
        self.correct_positions(body_a, body_b, contact.overlap);

        Some(PairResolution {
            contact,
            significant: is_significant_pair(&body_a.collider, &body_b.collider),
        })
    }
}

/// Outcome of re-testing a still-overlapping pair.
#[derive(Debug, Clone, Copy)]
pub struct PairResolution {
    pub contact: Contact,
    pub significant: bool,
}

/// Iterative solver over a record list.
///
/// Every pass re-tests and corrects each record; only the first pass feeds
/// `significant_collisions` and `collisions_info`, so gameplay sees a pair at
/// most once per tick even though later passes touch it again.
pub fn solve_records(
    bodies: &mut Arena<Body>,
    list: &mut CollisionRecordList,
    corrector: &PositionCorrector,
    passes: u32,
) -> usize {
    let CollisionRecordList {
        records,
        significant_collisions,
        collisions_info,
    } = list;

    let mut corrections = 0;
    for pass in 0..passes {
        for record in records.iter() {
            let Some(resolution) = corrector.resolve_pair(bodies, record.a, record.b) else {
                continue;
            };
            corrections += 1;

            if pass > 0 {
                continue;
            }
            let refreshed = CollisionRecord::new(record.a, record.b, &resolution.contact);
            collisions_info.push((refreshed.a, refreshed.b, refreshed.info_a, refreshed.info_b));
            if resolution.significant {
                significant_collisions.push(refreshed);
            }
        }
    }
    corrections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collider::Collider;
    use approx::assert_relative_eq;

    fn circle(position: Vec2) -> Body {
        Body::new(position, Collider::circle(16.0).enemy().build())
    }

    #[test]
    fn even_split_moves_both_bodies() {
        let mut a = circle(Vec2::ZERO);
        let mut b = circle(Vec2::new(20.0, 0.0));
        PositionCorrector::default().correct_positions(&mut a, &mut b, Vec2::new(12.0, 0.0));

        assert_relative_eq!(a.position.x, -4.5);
        assert_relative_eq!(b.position.x, 24.5);
    }

    #[test]
    fn static_side_never_moves() {
        let mut wall = Body::new(Vec2::ZERO, Collider::rect(48.0, 48.0).environment().build());
        let mut enemy = circle(Vec2::new(30.0, 0.0));
        let corrector = PositionCorrector::new(1.0);

        corrector.correct_positions(&mut wall, &mut enemy, Vec2::new(10.0, 0.0));
        assert_eq!(wall.position, Vec2::ZERO);
        assert_relative_eq!(enemy.position.x, 40.0);

        corrector.correct_positions(&mut enemy, &mut wall, Vec2::new(-5.0, 0.0));
        assert_eq!(wall.position, Vec2::ZERO);
        assert_relative_eq!(enemy.position.x, 45.0);
    }

    #[test]
    fn trigger_freezes_the_pair() {
        let mut trigger = Body::new(
            Vec2::ZERO,
            Collider::circle(16.0).player().correct_position(false).build(),
        );
        let mut enemy = circle(Vec2::new(20.0, 0.0));
        PositionCorrector::default().correct_positions(&mut trigger, &mut enemy, Vec2::new(12.0, 0.0));

        assert_eq!(trigger.position, Vec2::ZERO);
        assert_eq!(enemy.position, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn two_static_bodies_stay_put() {
        let collider = Collider::rect(10.0, 10.0).environment().build();
        assert_eq!(PositionCorrector::move_ratios(&collider, &collider), (0.0, 0.0));
    }

    #[test]
    fn only_first_pass_reports_significant_collisions() {
        let mut bodies = Arena::new();
        let player = bodies.insert_with(|id| Body {
            id,
            ..Body::new(Vec2::ZERO, Collider::circle(16.0).player().build())
        });
        let enemy = bodies.insert_with(|id| Body { id, ..circle(Vec2::new(20.0, 0.0)) });

        let contact = {
            let a = bodies.get(player).unwrap();
            let b = bodies.get(enemy).unwrap();
            NarrowPhase::collide(a.position, &a.collider, b.position, &b.collider).unwrap()
        };
        let mut list = CollisionRecordList::new();
        list.merge(vec![CollisionRecord::new(player, enemy, &contact)]);

        let corrections = solve_records(&mut bodies, &mut list, &PositionCorrector::default(), 3);

        // the pair still overlaps on every pass but is reported once
        assert_eq!(corrections, 3);
        assert_eq!(list.significant_collisions.len(), 1);
        assert_eq!(list.collisions_info.len(), 1);
        let distance = bodies.get(enemy).unwrap().position.x - bodies.get(player).unwrap().position.x;
        assert!(distance > 31.0 && distance < 32.0, "distance was {distance}");
    }
}

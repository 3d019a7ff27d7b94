use crate::{core::body::Body, utils::allocator::Arena, utils::math::approach};

/// Steps bodies forward by one tick.
///
/// Velocity eases towards the desired velocity at `acceleration_speed * dt`,
/// then position integrates velocity. Static bodies never move.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub dt: f32,
    parallel: bool,
}

impl Integrator {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            parallel: false,
        }
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn integrate_body(&self, body: &mut Body, dt: f32) {
        if body.is_static() {
            return;
        }

        body.velocity = approach(
            body.velocity,
            body.desired_velocity,
            body.acceleration_speed * dt,
        );
        body.position += body.velocity * dt;
    }

    pub fn step(&self, bodies: &mut Arena<Body>) {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                use rayon::prelude::*;
                let dt = self.dt;
                bodies
                    .par_values_mut()
                    .for_each(|body| self.integrate_body(body, dt));
                return;
            }
        }

        for body in bodies.values_mut() {
            self.integrate_body(body, self.dt);
        }
    }
}

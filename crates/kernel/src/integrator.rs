use crate::particle::Particle;
use glam::Vec3;
use skyline_common::PhysicsConfig;

/// Advances particles with semi-implicit Euler and quadratic drag.
///
/// Holds only constants; every call to [`step`](Self::step) depends solely on
/// the particle and `dt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    drag_threshold: f32,
    stop_threshold: f32,
    gravity: Vec3,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

impl Integrator {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            drag_threshold: config.drag_threshold,
            stop_threshold: config.stop_threshold,
            gravity: config.gravity,
        }
    }

    pub fn drag_threshold(&self) -> f32 {
        self.drag_threshold
    }

    pub fn stop_threshold(&self) -> f32 {
        self.stop_threshold
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Advance `particle` by `dt` seconds and clear its accumulated force.
    ///
    /// Position is advanced with the velocity from before this step's update
    /// (`x += v*dt + a*dt^2/2`, then `v += a*dt`). `dt` must be finite and
    /// non-negative; the particle's mass must be positive.
    pub fn step(&self, particle: &mut Particle, dt: f32) {
        self.apply_drag(particle);

        let acceleration = particle.force() / particle.mass();
        let velocity = particle.velocity();
        particle.set_position(
            particle.position() + velocity * dt + 0.5 * acceleration * dt * dt,
        );

        let mut velocity = velocity + acceleration * dt;
        if velocity.length() < self.stop_threshold {
            velocity = Vec3::ZERO;
        }
        particle.set_velocity(velocity);
        particle.clear_forces();

        tracing::trace!(
            position = %particle.position(),
            velocity = %velocity,
            dt,
            "integrated particle"
        );
    }

    /// The drag force [`step`](Self::step) will add for the particle's
    /// current velocity: magnitude `drag * |v|^2` opposing velocity, or zero
    /// at or below the drag threshold.
    pub fn drag_force(&self, particle: &Particle) -> Vec3 {
        let velocity = particle.velocity();
        let speed = velocity.length();
        if speed <= self.drag_threshold || speed == 0.0 {
            return Vec3::ZERO;
        }
        let direction = -velocity / speed;
        particle.drag() * velocity.dot(velocity) * direction
    }

    /// Accumulate [`drag_force`](Self::drag_force).
    pub fn apply_drag(&self, particle: &mut Particle) {
        let drag = self.drag_force(particle);
        if drag != Vec3::ZERO {
            particle.apply_force(drag);
        }
    }

    /// Accumulate the constant gravity force. Never called by [`step`](Self::step).
    pub fn apply_gravity(&self, particle: &mut Particle) {
        particle.apply_force(self.gravity);
    }
}

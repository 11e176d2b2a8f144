use glam::Vec3;

/// A point mass with accumulated force and a quadratic drag coefficient.
///
/// Position changes only through [`Integrator::step`](crate::Integrator::step)
/// or an explicit [`set_position`](Self::set_position) teleport.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: Vec3,
    velocity: Vec3,
    force: Vec3,
    drag: f32,
    mass: f32,
}

impl Particle {
    /// Create a particle at rest.
    ///
    /// `mass` must be positive and `drag` non-negative; both are fixed for the
    /// particle's lifetime. Callers validate these (see `SkylineConfig::validate`).
    pub fn new(position: Vec3, drag: f32, mass: f32) -> Self {
        debug_assert!(mass > 0.0, "particle mass must be positive");
        debug_assert!(drag >= 0.0, "particle drag must not be negative");
        Self {
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            drag,
            mass,
        }
    }

    /// Accumulate a force for the next integration step.
    pub fn apply_force(&mut self, f: Vec3) {
        self.force += f;
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, p: Vec3) {
        self.position = p;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, v: Vec3) {
        self.velocity = v;
    }

    /// Force accumulated since the last step.
    pub fn force(&self) -> Vec3 {
        self.force
    }

    pub fn drag(&self) -> f32 {
        self.drag
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

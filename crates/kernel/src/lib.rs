//! Kinematic core: point-mass particles, the drag integrator, the fly camera
//! orientation model, and the player that composes them.
//!
//! # Invariants
//! - Accumulated force is cleared exactly once per integration step.
//! - Camera pitch stays within `[-89, 89]` degrees and zoom within `[1, 45]`.
//! - The camera basis is derived from yaw/pitch only and is always orthonormal.
//! - The player's camera position always equals its body position.
//! - The kernel consumes [`ControlFrame`]s, never raw input events.

pub mod camera;
pub mod control;
pub mod integrator;
pub mod particle;
pub mod player;
pub mod world;

pub use camera::FlyCamera;
pub use control::{BrakeSettings, ControlFrame, MoveIntent};
pub use integrator::Integrator;
pub use particle::Particle;
pub use player::{Player, PlayerPreferences};
pub use world::{StepOutcome, World};

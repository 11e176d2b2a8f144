//! Shared configuration for the skyline workspace.
//!
//! # Invariants
//! - A config that passed [`SkylineConfig::validate`] satisfies every
//!   precondition of the kinematic core (positive mass, non-negative drag,
//!   pitch and zoom inside their clamp ranges).

pub mod config;

pub use config::{
    BindingsConfig, CameraConfig, ConfigError, FrameConfig, PhysicsConfig, PlayerConfig,
    SkylineConfig,
};

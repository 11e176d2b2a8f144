use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`SkylineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Integrator constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Speed above which quadratic drag is applied.
    pub drag_threshold: f32,
    /// Speed below which velocity snaps to zero after a step.
    pub stop_threshold: f32,
    /// Constant gravity force, applied only when `gravity_enabled` is set.
    pub gravity: Vec3,
    pub gravity_enabled: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 10.0,
            stop_threshold: 1.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            gravity_enabled: false,
        }
    }
}

/// Player body and control preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: Vec3,
    pub drag: f32,
    pub mass: f32,
    /// Mouse delta to degrees.
    pub sensitivity: f32,
    /// Movement intent to force.
    pub command_magnitude: f32,
    /// Maximum braking force per unit of speed.
    pub braking_constant: f32,
    /// Speed below which the brake does nothing.
    pub brake_threshold: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(81.0, 66.0, -1800.0),
            drag: 0.01,
            mass: 1.0,
            sensitivity: 0.1,
            command_magnitude: 500.0,
            braking_constant: 10.0,
            brake_threshold: 1.0,
        }
    }
}

/// Initial orientation and projection parameters. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view, clamped to `[1, 45]`.
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            yaw: -90.0,
            pitch: 0.0,
            zoom: 45.0,
            near: 0.1,
            far: 100_000.0,
        }
    }
}

/// Frame pacing and statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound on the wall-clock delta handed to the simulation.
    pub max_dt: f32,
    /// Number of frames averaged for the FPS readout.
    pub fps_window: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            fps_window: 30,
        }
    }
}

/// Key names bound to each control action. Names are resolved by the input crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub brake: String,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            forward: "W".into(),
            backward: "S".into(),
            left: "A".into(),
            right: "D".into(),
            brake: "LeftShift".into(),
        }
    }
}

/// Complete runtime configuration. Every section falls back to its defaults
/// when omitted from the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkylineConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub frame: FrameConfig,
    pub bindings: BindingsConfig,
}

impl SkylineConfig {
    /// Load a config file, choosing the parser from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the preconditions the kinematic core relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        non_negative("physics.drag_threshold", p.drag_threshold)?;
        positive("physics.stop_threshold", p.stop_threshold)?;
        finite_vec("physics.gravity", p.gravity)?;

        let pl = &self.player;
        finite_vec("player.spawn", pl.spawn)?;
        non_negative("player.drag", pl.drag)?;
        positive("player.mass", pl.mass)?;
        positive("player.sensitivity", pl.sensitivity)?;
        non_negative("player.command_magnitude", pl.command_magnitude)?;
        non_negative("player.braking_constant", pl.braking_constant)?;
        non_negative("player.brake_threshold", pl.brake_threshold)?;

        let c = &self.camera;
        finite("camera.yaw", c.yaw)?;
        in_range("camera.pitch", c.pitch, -89.0, 89.0)?;
        in_range("camera.zoom", c.zoom, 1.0, 45.0)?;
        positive("camera.near", c.near)?;
        finite("camera.far", c.far)?;
        if c.far <= c.near {
            return Err(invalid(
                "camera.far",
                format!("{} must exceed near plane {}", c.far, c.near),
            ));
        }

        positive("frame.max_dt", self.frame.max_dt)?;
        if self.frame.fps_window == 0 {
            return Err(invalid("frame.fps_window", "must be at least 1".into()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn finite(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} is not finite")))
    }
}

fn finite_vec(field: &'static str, v: Vec3) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} is not finite")))
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(field, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} must be greater than zero")))
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    finite(field, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} must not be negative")))
    }
}

fn in_range(field: &'static str, v: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, v)?;
    if (min..=max).contains(&v) {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} outside [{min}, {max}]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = SkylineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.player.spawn, Vec3::new(81.0, 66.0, -1800.0));
        assert!(!config.physics.gravity_enabled);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = SkylineConfig::from_yaml_str("player:\n  mass: 2.5\n").unwrap();
        assert_eq!(config.player.mass, 2.5);
        assert_eq!(config.player.drag, 0.01);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn zero_mass_rejected() {
        let err = SkylineConfig::from_yaml_str("player:\n  mass: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "player.mass", .. }));
    }

    #[test]
    fn negative_drag_rejected() {
        let err = SkylineConfig::from_json_str(r#"{"player": {"drag": -1.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "player.drag", .. }));
    }

    #[test]
    fn zoom_out_of_range_rejected() {
        let err = SkylineConfig::from_yaml_str("camera:\n  zoom: 80.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.zoom", .. }));
    }

    #[test]
    fn pitch_out_of_range_rejected() {
        let err = SkylineConfig::from_yaml_str("camera:\n  pitch: 95.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.pitch", .. }));
    }

    #[test]
    fn far_plane_must_exceed_near() {
        let err = SkylineConfig::from_yaml_str("camera:\n  near: 10.0\n  far: 5.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.far", .. }));
    }

    #[test]
    fn empty_fps_window_rejected() {
        let err = SkylineConfig::from_yaml_str("frame:\n  fps_window: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "frame.fps_window", .. }));
    }

    #[test]
    fn yaml_roundtrip_preserves_values() {
        let mut config = SkylineConfig::default();
        config.physics.gravity_enabled = true;
        config.bindings.brake = "Space".into();
        let text = config.to_yaml().unwrap();
        let back = SkylineConfig::from_yaml_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn load_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "player:\n  command_magnitude: 250.0").unwrap();
        let config = SkylineConfig::load(file.path()).unwrap();
        assert_eq!(config.player.command_magnitude, 250.0);
    }

    #[test]
    fn load_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"frame": {{"max_dt": 0.05}}}}"#).unwrap();
        let config = SkylineConfig::load(file.path()).unwrap();
        assert_eq!(config.frame.max_dt, 0.05);
    }

    #[test]
    fn unknown_extension_rejected() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = SkylineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "toml"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SkylineConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

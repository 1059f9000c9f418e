//! Simulation tuning and validation
//!
//! Every construction path runs [`SimulationConfig::validate`], so the tick loop
//! never has to defend against NaN damping or negative radii.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Velocity response applied when two particles overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionModel {
    /// Impulse along the contact normal with restitution, skipped when separating
    #[default]
    Impulse,
    /// Mass-weighted exchange of the velocity component along the centre line
    MomentumExchange,
}

impl CollisionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionModel::Impulse => "impulse",
            CollisionModel::MomentumExchange => "momentum_exchange",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "impulse" => Some(CollisionModel::Impulse),
            "momentum" | "momentum_exchange" | "exchange" => Some(CollisionModel::MomentumExchange),
            _ => None,
        }
    }
}

/// Container size in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both extents finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ConfigError::InvalidBounds {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(BOX_WIDTH, BOX_HEIGHT)
    }
}

/// Errors raised while building or editing a simulation
#[derive(Debug)]
pub enum ConfigError {
    /// A scalar parameter fell outside its allowed range
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },
    /// A vector parameter had a NaN or infinite component
    NonFinite { field: &'static str },
    /// Container extents were not finite and positive
    InvalidBounds { width: f32, height: f32 },
    /// A particle radius was not finite and positive
    InvalidRadius { particle: usize, value: f32 },
    /// A particle mass was not finite and positive
    InvalidMass { particle: usize, value: f32 },
    /// A particle position or velocity was not finite
    NonFiniteState { particle: usize },
    /// Two particles carried the same external label
    DuplicateLabel(String),
    /// No particle matched the given id or label
    UnknownParticle(String),
    /// JSON could not be parsed
    Parse(serde_json::Error),
    /// File could not be read or written
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "{field} = {value} is out of range (expected {expected})"),
            ConfigError::NonFinite { field } => write!(f, "{field} must be finite"),
            ConfigError::InvalidBounds { width, height } => {
                write!(f, "bounds {width}x{height} must be finite and positive")
            }
            ConfigError::InvalidRadius { particle, value } => {
                write!(f, "particle {particle}: radius {value} must be finite and > 0")
            }
            ConfigError::InvalidMass { particle, value } => {
                write!(f, "particle {particle}: mass {value} must be finite and > 0")
            }
            ConfigError::NonFiniteState { particle } => {
                write!(f, "particle {particle}: position and velocity must be finite")
            }
            ConfigError::DuplicateLabel(label) => write!(f, "duplicate particle label {label:?}"),
            ConfigError::UnknownParticle(key) => write!(f, "no particle matches {key}"),
            ConfigError::Parse(e) => write!(f, "invalid JSON: {e}"),
            ConfigError::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// Tunable parameters for one simulation
///
/// Immutable for a run except `bounds`, which is only the starting size: the
/// live container size comes from a [`crate::sim::BoundsSource`] each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Acceleration used when no motion input is live
    pub gravity: Vec2,
    /// Velocity kept after a wall bounce, in [0, 1]
    pub wall_damping: f32,
    /// Velocity kept after a particle collision, in [0, 1]
    pub collision_damping: f32,
    /// Per-axis speeds below this snap to zero
    pub velocity_epsilon: f32,
    pub bounds: Bounds,
    /// Push-apart velocity per pixel of half-overlap between particles
    pub particle_nudge_factor: f32,
    /// Push-back velocity per pixel a particle is embedded in a wall
    pub wall_nudge_factor: f32,
    /// Restitution for [`CollisionModel::Impulse`], in [0, 1]
    pub restitution: f32,
    /// Per-tick velocity multiplier, in [0, 1]
    pub air_damping: f32,
    /// Extra distance added to `ra + rb` when testing for overlap
    pub collision_margin: f32,
    pub collision_model: CollisionModel,
    pub tilt_divisor: f32,
    pub acceleration_divisor: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, GRAVITY_Y),
            wall_damping: WALL_DAMPING,
            collision_damping: COLLISION_DAMPING,
            velocity_epsilon: VELOCITY_EPSILON,
            bounds: Bounds::default(),
            particle_nudge_factor: PARTICLE_NUDGE_FACTOR,
            wall_nudge_factor: WALL_NUDGE_FACTOR,
            restitution: RESTITUTION,
            air_damping: AIR_DAMPING,
            collision_margin: 0.0,
            collision_model: CollisionModel::Impulse,
            tilt_divisor: TILT_DIVISOR,
            acceleration_divisor: ACCELERATION_DIVISOR,
        }
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "[0, 1]",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: ">= 0",
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "> 0",
        })
    }
}

impl SimulationConfig {
    /// Check every parameter against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFinite { field: "gravity" });
        }
        unit_interval("wall_damping", self.wall_damping)?;
        unit_interval("collision_damping", self.collision_damping)?;
        unit_interval("restitution", self.restitution)?;
        unit_interval("air_damping", self.air_damping)?;
        non_negative("velocity_epsilon", self.velocity_epsilon)?;
        non_negative("particle_nudge_factor", self.particle_nudge_factor)?;
        non_negative("wall_nudge_factor", self.wall_nudge_factor)?;
        non_negative("collision_margin", self.collision_margin)?;
        positive("tilt_divisor", self.tilt_divisor)?;
        positive("acceleration_divisor", self.acceleration_divisor)?;
        self.bounds.validate()
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed JSON, readable back with [`SimulationConfig::from_json`]
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Write the config to a file as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Simulation config saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_damping_out_of_range_rejected() {
        let config = SimulationConfig {
            wall_damping: 1.5,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "wall_damping"),
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_collision_damping_rejected() {
        let config = SimulationConfig {
            collision_damping: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_bounds_rejected() {
        let config = SimulationConfig {
            bounds: Bounds::new(f32::INFINITY, 100.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_non_finite_gravity_rejected() {
        let config = SimulationConfig {
            gravity: Vec2::new(0.0, f32::NAN),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "gravity" })
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "wall_damping": 0.5, "collision_model": "momentum_exchange" }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.wall_damping, 0.5);
        assert_eq!(config.collision_model, CollisionModel::MomentumExchange);
        assert_eq!(config.tilt_divisor, TILT_DIVISOR);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let config = SimulationConfig {
            gravity: Vec2::new(0.5, -0.25),
            bounds: Bounds::new(320.0, 240.0),
            collision_model: CollisionModel::MomentumExchange,
            air_damping: 0.99,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"momentum_exchange\""));

        let name = format!("tilt-box-config-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        config.save(&path).unwrap();
        let loaded = SimulationConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("tilt-box-no-such-config.json");
        assert!(matches!(SimulationConfig::load(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_json_value_rejected_after_parse() {
        let json = r#"{ "velocity_epsilon": -1.0 }"#;
        assert!(SimulationConfig::from_json(json).is_err());
    }

    #[test]
    fn test_collision_model_from_str() {
        assert_eq!(
            CollisionModel::from_str("Momentum"),
            Some(CollisionModel::MomentumExchange)
        );
        assert_eq!(CollisionModel::from_str("impulse"), Some(CollisionModel::Impulse));
        assert_eq!(CollisionModel::from_str("verlet"), None);
    }
}

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use superplat_core::geometry::Vec2;

/// Default downward acceleration (units/s^2).
pub const GRAVITY: f32 = 550.0;
/// Nearest candidates tested per broad-phase query.
pub const BROADPHASE_NEIGHBORS: usize = 12;
/// Frame-time ceiling in milliseconds (~24 FPS).
pub const MAX_FRAME_MS: u64 = 41;

/// Integrator and broad-phase tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub broadphase_neighbors: usize,
    pub max_frame_ms: u64,
    /// Velocity clamp for moving bodies that do not set their own.
    pub terminal_velocity: Vec2,
    pub jump_impulse: f32,
    /// Fraction of horizontal speed kept after one second without input.
    pub friction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            broadphase_neighbors: BROADPHASE_NEIGHBORS,
            max_frame_ms: MAX_FRAME_MS,
            terminal_velocity: Vec2::new(70.0, 90.0),
            jump_impulse: 250.0,
            friction: 0.0396,
        }
    }
}

/// Top-level level configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub physics: PhysicsConfig,
    pub bump_distance: f32,
    pub bump_speed: f32,
    pub time_tick_ms: u32,
    pub respawn_delay_ms: u32,
    pub end_delay_ms: u32,
    pub enemy_remove_delay_ms: u32,
    pub player_lives: u32,
    /// Seed for the level's random choices (power-up walk direction).
    pub seed: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            bump_distance: 5.0,
            bump_speed: 70.0,
            time_tick_ms: 1000,
            respawn_delay_ms: 3000,
            end_delay_ms: 4000,
            enemy_remove_delay_ms: 2000,
            player_lives: 3,
            seed: 42,
        }
    }
}

/// Failure to read or parse a config file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl LevelConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from `SUPERPLAT_LEVEL_CONFIG`, else `config/level.toml`, else defaults.
    pub fn load() -> Self {
        let path = std::env::var("SUPERPLAT_LEVEL_CONFIG")
            .unwrap_or_else(|_| "config/level.toml".to_string());
        match Self::from_path(&path) {
            Ok(cfg) => cfg,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(e) => {
                tracing::warn!("{path}: {e}, using defaults");
                Self::default()
            },
        }
    }

    pub fn max_frame_time(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.physics.max_frame_ms)
    }
}

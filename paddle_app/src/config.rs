//! Game configuration loaded from an optional TOML file

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors produced while loading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level game configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window settings
    pub window: WindowConfig,

    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Rendering settings
    pub rendering: RenderingConfig,
}

/// Window configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in pixels
    pub width: u32,

    /// Window height in pixels
    pub height: u32,
}

/// Gameplay configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Ball radius in world units
    pub ball_radius: f32,

    /// Horizontal ball speed in world units per second
    pub ball_speed: f32,

    /// Paddle follows the ball automatically
    pub autoplay: bool,

    /// Frames to run in the headless demo loop
    pub demo_frames: u32,
}

/// Rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Start with the compute ray tracer instead of the rasterizer
    pub ray_tracing_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            gameplay: GameplayConfig::default(),
            rendering: RenderingConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1366,
            height: 768,
        }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            ball_radius: 3.0,
            ball_speed: 60.0,
            autoplay: false,
            demo_frames: 600,
        }
    }
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            ray_tracing_enabled: true,
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load from `path` if given, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&str>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|err| {
                log::warn!("failed to load config from {path}: {err}; using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

//! Configuration system
//!
//! Configuration is loaded once by the caller before the loop starts and then
//! passed by value into the engine. Nothing in the core reads configuration
//! from a global.

pub use serde::{Serialize, Deserialize};

use crate::foundation::time::DEFAULT_MAX_DELTA;
use crate::input::KeyCode;
use crate::physics::CollisionPolicy;
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load configuration from file, or fall back to defaults if the file is missing
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub title: String,

    /// Window width
    pub width: u32,

    /// Window height
    pub height: u32,

    /// Whether to start in fullscreen
    pub fullscreen: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Arcade Engine".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
        }
    }
}

/// Logical simulation area, independent of the window size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Level width in pixels
    pub width: u32,
    /// Level height in pixels
    pub height: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self { width: 400, height: 300 }
    }
}

/// Keys the engine itself reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Toggles pause
    pub pause: KeyCode,
    /// Toggles the hitbox/FPS overlay
    pub debug_overlay: KeyCode,
    /// Held to quit
    pub quit: KeyCode,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            pause: KeyCode::P,
            debug_overlay: KeyCode::F3,
            quit: KeyCode::Escape,
        }
    }
}

/// Engine configuration, fixed for the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window settings
    pub display: DisplayConfig,

    /// Logical simulation area
    pub level: LevelConfig,

    /// Target frame rate (0 = uncapped)
    pub target_fps: u32,

    /// Upper bound for a frame's delta time in seconds
    pub max_delta: f32,

    /// Start with the debug overlay enabled
    pub debug: bool,

    /// How the collision pass treats entities that already handled a hit
    pub collision_policy: CollisionPolicy,

    /// Engine-level key bindings
    pub controls: ControlsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            level: LevelConfig::default(),
            target_fps: 60,
            max_delta: DEFAULT_MAX_DELTA,
            debug: false,
            collision_policy: CollisionPolicy::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set the window size
    pub fn with_display_size(mut self, width: u32, height: u32) -> Self {
        self.display.width = width;
        self.display.height = height;
        self
    }

    /// Set the logical level size
    pub fn with_level_size(mut self, width: u32, height: u32) -> Self {
        self.level = LevelConfig { width, height };
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Enable debug overlay at startup
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Select the collision policy
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid {
                field: "display",
                reason: format!("size must be non-zero, got {}x{}", self.display.width, self.display.height),
            });
        }
        if self.level.width == 0 || self.level.height == 0 {
            return Err(ConfigError::Invalid {
                field: "level",
                reason: format!("size must be non-zero, got {}x{}", self.level.width, self.level.height),
            });
        }
        if self.max_delta.is_nan() || self.max_delta <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_delta",
                reason: format!("must be positive, got {}", self.max_delta),
            });
        }
        Ok(())
    }
}

impl Config for EngineConfig {}

//! Game configuration

use arcade_engine::config::{Config, ConfigError, EngineConfig};
use serde::{Deserialize, Serialize};

/// Space-Shooter configuration, loaded once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    /// Engine settings
    pub engine: EngineConfig,

    /// Player ship tuning
    pub player: PlayerConfig,

    /// Missile tuning
    pub missile: MissileConfig,

    /// Meteor spawning and behavior
    pub meteors: MeteorConfig,

    /// Frames the headless demo runs before closing
    pub demo_frames: u64,
}

/// Player ship tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal speed (pixels per second)
    pub speed: f32,

    /// Starting lives
    pub lives: u32,

    /// Minimum time between missiles (seconds)
    pub fire_delay: f32,

    /// Invincibility after a hit (seconds)
    pub damage_time: f32,

    /// Visibility toggle period while invincible (seconds)
    pub blink_interval: f32,

    /// Hitbox width
    pub width: f32,

    /// Hitbox height
    pub height: f32,

    /// Distance of the ship centre from the bottom of the level
    pub bottom_margin: f32,
}

/// Missile tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileConfig {
    /// Upward speed (pixels per second)
    pub speed: f32,

    /// Hit points removed from a meteor per hit
    pub damage: u32,

    /// Hitbox width
    pub width: f32,

    /// Hitbox height
    pub height: f32,

    /// Meteors destroyed closer than this also take the missile out
    pub blast_radius: f32,
}

/// Relative weights of the meteor size categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeWeights {
    /// Big meteors
    pub big: u32,
    /// Medium meteors
    pub medium: u32,
    /// Small meteors
    pub small: u32,
    /// Tiny meteors
    pub tiny: u32,
}

impl Default for SizeWeights {
    fn default() -> Self {
        Self {
            big: 20,
            medium: 35,
            small: 30,
            tiny: 15,
        }
    }
}

/// Relative weights of the meteor colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorWeights {
    /// Brown meteors
    pub brown: u32,
    /// Grey meteors
    pub grey: u32,
}

impl Default for ColorWeights {
    fn default() -> Self {
        Self { brown: 60, grey: 40 }
    }
}

/// Meteor spawning and behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteorConfig {
    /// Seconds between spawns at the start of a session
    pub spawn_interval: f32,

    /// Lower bound for the spawn interval
    pub min_spawn_interval: f32,

    /// Seconds removed from the spawn interval per second played
    pub difficulty_ramp: f32,

    /// Size category weights
    pub size_weights: SizeWeights,

    /// Colour weights
    pub color_weights: ColorWeights,

    /// How long a damaged meteor stays hidden (seconds)
    pub blink_time: f32,

    /// Meteors further than this outside the level are removed
    pub despawn_margin: f32,

    /// Spawn height (negative = above the level)
    pub spawn_y: f32,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        let mut engine = EngineConfig::default();
        engine.display.title = "Space Shooter".to_string();
        Self {
            engine,
            player: PlayerConfig::default(),
            missile: MissileConfig::default(),
            meteors: MeteorConfig::default(),
            demo_frames: 600,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 250.0,
            lives: 3,
            fire_delay: 0.5,
            damage_time: 2.0,
            blink_interval: 0.13,
            width: 40.0,
            height: 40.0,
            bottom_margin: 50.0,
        }
    }
}

impl Default for MissileConfig {
    fn default() -> Self {
        Self {
            speed: 500.0,
            damage: 1,
            width: 10.0,
            height: 20.0,
            blast_radius: 50.0,
        }
    }
}

impl Default for MeteorConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 1.5,
            min_spawn_interval: 0.5,
            difficulty_ramp: 0.01,
            size_weights: SizeWeights::default(),
            color_weights: ColorWeights::default(),
            blink_time: 0.15,
            despawn_margin: 100.0,
            spawn_y: -50.0,
        }
    }
}

impl ShooterConfig {
    /// Validate engine and game settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        if self.player.speed <= 0.0 || self.missile.speed <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "speed",
                reason: "player and missile speeds must be positive".to_string(),
            });
        }
        if self.player.lives == 0 {
            return Err(ConfigError::Invalid {
                field: "player.lives",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.player.width < 0.0 || self.player.height < 0.0 || self.missile.width < 0.0 || self.missile.height < 0.0 {
            return Err(ConfigError::Invalid {
                field: "hitbox",
                reason: "dimensions must be non-negative".to_string(),
            });
        }

        let sizes = self.meteors.size_weights;
        if sizes.big + sizes.medium + sizes.small + sizes.tiny == 0 {
            return Err(ConfigError::Invalid {
                field: "meteors.size_weights",
                reason: "at least one weight must be non-zero".to_string(),
            });
        }
        let colors = self.meteors.color_weights;
        if colors.brown + colors.grey == 0 {
            return Err(ConfigError::Invalid {
                field: "meteors.color_weights",
                reason: "at least one weight must be non-zero".to_string(),
            });
        }
        if self.meteors.min_spawn_interval <= 0.0 || self.meteors.spawn_interval < self.meteors.min_spawn_interval {
            return Err(ConfigError::Invalid {
                field: "meteors.spawn_interval",
                reason: format!(
                    "need 0 < min ({}) <= interval ({})",
                    self.meteors.min_spawn_interval, self.meteors.spawn_interval
                ),
            });
        }
        Ok(())
    }
}

impl Config for ShooterConfig {}

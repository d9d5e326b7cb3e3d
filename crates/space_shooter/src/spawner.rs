//! Meteor spawning with a difficulty ramp

use crate::catalog::{MeteorColor, MeteorKind, MeteorSize};
use crate::config::MeteorConfig;
use crate::entities::meteor::{Meteor, MeteorLaunch};
use crate::events::ShooterEvent;
use arcade_engine::config::ConfigError;
use arcade_engine::foundation::math::Vec2;
use arcade_engine::scene::{EntityId, World};
use arcade_engine::GameError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Drops meteors from above the level at a shrinking interval
#[derive(Debug, Clone)]
pub struct MeteorSpawner {
    config: MeteorConfig,
    missile_damage: u32,
    sizes: WeightedIndex<u32>,
    colors: WeightedIndex<u32>,
    rng: StdRng,
    timer: f32,
    interval: f32,
    spawned: u64,
}

impl MeteorSpawner {
    /// Spawner drawing from `rng`; pass a seeded rng for reproducible runs
    pub fn new(config: MeteorConfig, missile_damage: u32, rng: StdRng) -> Result<Self, ConfigError> {
        let weights = config.size_weights;
        let sizes = WeightedIndex::new([weights.big, weights.medium, weights.small, weights.tiny])
            .map_err(|e| ConfigError::Invalid {
                field: "meteors.size_weights",
                reason: e.to_string(),
            })?;
        let colors = WeightedIndex::new([config.color_weights.brown, config.color_weights.grey])
            .map_err(|e| ConfigError::Invalid {
                field: "meteors.color_weights",
                reason: e.to_string(),
            })?;
        let interval = config.spawn_interval;
        Ok(Self {
            config,
            missile_damage,
            sizes,
            colors,
            rng,
            timer: 0.0,
            interval,
            spawned: 0,
        })
    }

    /// Spawner seeded from the OS
    pub fn from_entropy(config: MeteorConfig, missile_damage: u32) -> Result<Self, ConfigError> {
        Self::new(config, missile_damage, StdRng::from_entropy())
    }

    /// Current seconds between spawns
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Meteors spawned since the last reset
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Advance by `delta_time`; spawns when the interval has elapsed
    pub fn tick(&mut self, delta_time: f32, world: &mut World<ShooterEvent>) -> Result<Option<EntityId>, GameError> {
        self.interval = (self.interval - self.config.difficulty_ramp * delta_time).max(self.config.min_spawn_interval);
        self.timer += delta_time;
        if self.timer < self.interval {
            return Ok(None);
        }
        self.timer -= self.interval;
        self.spawn(world).map(Some)
    }

    /// Register a random meteor just above the level
    pub fn spawn(&mut self, world: &mut World<ShooterEvent>) -> Result<EntityId, GameError> {
        let kind = self.choose_kind();
        let stats = kind.stats();
        let (level_width, _) = world.level_size();

        let half = stats.hitbox / 2.0;
        let max_x = (level_width as f32 - half).max(half);
        let launch = MeteorLaunch {
            position: Vec2::new(self.rng.gen_range(half..=max_x), self.config.spawn_y),
            velocity: Vec2::new(
                self.rng.gen_range(stats.speed_x.0..=stats.speed_x.1),
                self.rng.gen_range(stats.speed_y.0..=stats.speed_y.1),
            ),
            spin: self.rng.gen_range(stats.spin.0..=stats.spin.1),
        };

        let entity = Meteor::spawn(kind, launch, &self.config, self.missile_damage)?;
        let id = entity.id();
        world.register(entity);
        self.spawned += 1;
        log::debug!("Spawned {} meteor {} at x={:.0}", kind, id, launch.position.x);
        Ok(id)
    }

    /// Weighted pick of size and colour, uniform variant
    pub fn choose_kind(&mut self) -> MeteorKind {
        let size = MeteorSize::ALL[self.sizes.sample(&mut self.rng)];
        let color = MeteorColor::ALL[self.colors.sample(&mut self.rng)];
        let variant = self.rng.gen_range(1..=MeteorKind::VARIANTS);
        MeteorKind::new(size, color, variant)
    }

    /// Back to the starting interval for a new session
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.interval = self.config.spawn_interval;
        self.spawned = 0;
    }
}

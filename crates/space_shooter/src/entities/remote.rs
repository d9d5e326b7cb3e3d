//! Local mirrors of other players' ships and missiles
//!
//! Both are driven by relay events; neither reacts to local collisions.

use crate::config::{MissileConfig, PlayerConfig};
use crate::entities::{OTHER_MISSILE, OTHER_PLAYER};
use crate::events::{RemoteEvent, ShooterEvent};
use arcade_engine::foundation::math::Vec2;
use arcade_engine::render::{Color, Surface};
use arcade_engine::scene::{
    CollisionResponder, Drawable, Entity, EntityCore, EntityError, EntityId, EventListener,
    Hitbox, HookResult, Updatable, World,
};

/// Another player's ship
#[derive(Debug, Clone)]
pub struct OtherPlayer {
    player_id: u64,
    name: String,
    lives: u32,
    score: i64,
    damage_time: f32,
    blink_interval: f32,
    invincible: f32,
    blink_timer: f32,
}

impl OtherPlayer {
    /// Registry id of the mirror for `player_id`
    pub fn entity_id(player_id: u64) -> EntityId {
        EntityId::remote(OTHER_PLAYER, player_id)
    }

    /// Mirror entity placed where the local ship would start
    pub fn spawn(
        player_id: u64,
        name: impl Into<String>,
        config: &PlayerConfig,
        level: (u32, u32),
    ) -> Result<Entity<ShooterEvent>, EntityError> {
        let position = Vec2::new(level.0 as f32 / 2.0, level.1 as f32 - config.bottom_margin);
        let core = EntityCore::with_id(Self::entity_id(player_id), OTHER_PLAYER, position)
            .with_hitbox(Hitbox::new(config.width, config.height)?);
        let player = Self {
            player_id,
            name: name.into(),
            lives: config.lives,
            score: 0,
            damage_time: config.damage_time,
            blink_interval: config.blink_interval,
            invincible: 0.0,
            blink_timer: 0.0,
        };
        Ok(Entity::new(core, player))
    }

    /// Server-assigned id
    pub fn player_id(&self) -> u64 {
        self.player_id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lives as last reported
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Score as accumulated from relay updates
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Apply a score change from the relay
    pub fn add_score(&mut self, delta: i64) {
        self.score = self.score.saturating_add(delta);
    }
}

impl Updatable<ShooterEvent> for OtherPlayer {
    fn on_update(&mut self, core: &mut EntityCore, world: &mut World<ShooterEvent>) -> HookResult {
        if self.invincible <= 0.0 {
            return Ok(());
        }
        let dt = world.delta_time();
        self.invincible -= dt;
        self.blink_timer -= dt;
        if self.blink_timer <= 0.0 {
            core.toggle_visibility();
            self.blink_timer += self.blink_interval;
        }
        if self.invincible <= 0.0 {
            self.invincible = 0.0;
            core.set_visible(true);
        }
        Ok(())
    }
}

impl Drawable for OtherPlayer {
    fn draw(&self, core: &EntityCore, surface: &mut dyn Surface) {
        surface.draw_sprite("other_spaceship", core.position(), 0.0);
        let label = Vec2::new(core.position().x - 20.0, core.position().y + 25.0);
        surface.draw_text(&self.name, label, Color::WHITE);
    }

    fn hitbox_color(&self) -> Color {
        Color::BLUE
    }
}

impl CollisionResponder<ShooterEvent> for OtherPlayer {}

impl EventListener<ShooterEvent> for OtherPlayer {
    fn on_game_event(&mut self, core: &mut EntityCore, event: &ShooterEvent, _world: &mut World<ShooterEvent>) -> bool {
        match event {
            ShooterEvent::Remote(RemoteEvent::PlayerHit { player_id, lives }) if *player_id == self.player_id => {
                self.lives = *lives;
                self.invincible = self.damage_time;
                self.blink_timer = self.blink_interval;
                core.set_visible(false);
                true
            }
            ShooterEvent::GameOver => {
                self.invincible = 0.0;
                core.set_visible(true);
                core.set_velocity(Vec2::zeros());
                true
            }
            _ => false,
        }
    }
}

/// Another player's missile; purely visual
#[derive(Debug, Clone)]
pub struct OtherMissile {
    player_id: u64,
    half_height: f32,
}

impl OtherMissile {
    /// Registry id of the mirror for `missile_id`
    pub fn entity_id(missile_id: u64) -> EntityId {
        EntityId::remote(OTHER_MISSILE, missile_id)
    }

    /// Mirror entity launched from `origin`
    pub fn spawn(player_id: u64, missile_id: u64, origin: Vec2, config: &MissileConfig) -> Entity<ShooterEvent> {
        let core = EntityCore::with_id(Self::entity_id(missile_id), OTHER_MISSILE, origin)
            .with_velocity(Vec2::new(0.0, -config.speed));
        let missile = Self {
            player_id,
            half_height: config.height / 2.0,
        };
        Entity::new(core, missile)
    }

    /// Player who fired it
    pub fn player_id(&self) -> u64 {
        self.player_id
    }
}

impl Updatable<ShooterEvent> for OtherMissile {
    fn on_update(&mut self, core: &mut EntityCore, world: &mut World<ShooterEvent>) -> HookResult {
        if core.position().y + self.half_height <= 0.0 {
            world.unregister(core.id());
        }
        Ok(())
    }
}

impl Drawable for OtherMissile {
    fn draw(&self, core: &EntityCore, surface: &mut dyn Surface) {
        surface.draw_sprite("other_missile", core.position(), 0.0);
    }
}

impl CollisionResponder<ShooterEvent> for OtherMissile {}

impl EventListener<ShooterEvent> for OtherMissile {
    fn on_game_event(&mut self, core: &mut EntityCore, event: &ShooterEvent, _world: &mut World<ShooterEvent>) -> bool {
        if let ShooterEvent::GameOver = event {
            core.destroy();
            return true;
        }
        false
    }
}

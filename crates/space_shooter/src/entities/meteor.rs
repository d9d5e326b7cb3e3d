//! Falling meteors

use crate::catalog::MeteorKind;
use crate::config::MeteorConfig;
use crate::entities::{METEOR, MISSILE};
use crate::events::{MeteorDestroyed, ShooterEvent};
use arcade_engine::foundation::math::Vec2;
use arcade_engine::render::{Color, Surface};
use arcade_engine::scene::{
    CollisionResponder, Drawable, Entity, EntityCore, EntityError, EntityId, EventListener,
    Hitbox, HookResult, Updatable, World,
};

/// Initial motion of a meteor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorLaunch {
    /// Spawn position
    pub position: Vec2,
    /// Velocity in pixels per second
    pub velocity: Vec2,
    /// Spin in degrees per second
    pub spin: f32,
}

/// Meteor that takes a few missile hits before breaking up
#[derive(Debug, Clone)]
pub struct Meteor {
    kind: MeteorKind,
    hp: u32,
    points: u32,
    missile_damage: u32,
    blink_time: f32,
    blink_timer: f32,
    despawn_margin: f32,
}

impl Meteor {
    /// Behavior for `kind` with the catalog's hp and points
    pub fn new(kind: MeteorKind, config: &MeteorConfig, missile_damage: u32) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            hp: stats.hp,
            points: stats.points,
            missile_damage,
            blink_time: config.blink_time,
            blink_timer: 0.0,
            despawn_margin: config.despawn_margin,
        }
    }

    /// Override the starting hit points
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp;
        self
    }

    /// Locally spawned meteor entity
    pub fn spawn(
        kind: MeteorKind,
        launch: MeteorLaunch,
        config: &MeteorConfig,
        missile_damage: u32,
    ) -> Result<Entity<ShooterEvent>, EntityError> {
        let core = EntityCore::new(METEOR, launch.position);
        Self::build(core, kind, launch, config, missile_damage)
    }

    /// Meteor entity mirrored from the server under its server id
    pub fn spawn_remote(
        meteor_id: u64,
        kind: MeteorKind,
        launch: MeteorLaunch,
        config: &MeteorConfig,
        missile_damage: u32,
    ) -> Result<Entity<ShooterEvent>, EntityError> {
        let core = EntityCore::with_id(EntityId::remote(METEOR, meteor_id), METEOR, launch.position);
        Self::build(core, kind, launch, config, missile_damage)
    }

    fn build(
        core: EntityCore,
        kind: MeteorKind,
        launch: MeteorLaunch,
        config: &MeteorConfig,
        missile_damage: u32,
    ) -> Result<Entity<ShooterEvent>, EntityError> {
        let side = kind.stats().hitbox;
        let core = core
            .with_velocity(launch.velocity)
            .with_rotation(0.0, launch.spin)
            .with_hitbox(Hitbox::new(side, side)?);
        Ok(Entity::new(core, Self::new(kind, config, missile_damage)))
    }

    /// Kind
    pub fn kind(&self) -> MeteorKind {
        self.kind
    }

    /// Hit points left
    pub fn hp(&self) -> u32 {
        self.hp
    }

    /// Score for destroying it
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Apply `damage`; at zero hp the meteor is destroyed and announced
    ///
    /// Returns true when this hit destroyed the meteor.
    pub fn take_damage(&mut self, core: &mut EntityCore, damage: u32, world: &mut World<ShooterEvent>) -> bool {
        if core.is_destroyed() {
            return false;
        }
        self.hp = self.hp.saturating_sub(damage);
        if self.hp > 0 {
            core.set_visible(false);
            self.blink_timer = self.blink_time;
            return false;
        }

        core.destroy();
        let position = core.position();
        log::debug!("Meteor {} ({}) destroyed", core.id(), self.kind);
        world.emit(ShooterEvent::MeteorDestroyed(MeteorDestroyed {
            points: self.points,
            x: position.x,
            y: position.y,
            meteor: core.id(),
        }));
        world.unregister(core.id());
        true
    }

    fn out_of_play(&self, core: &EntityCore, world: &World<ShooterEvent>) -> bool {
        let bounds = world.level_bounds();
        let position = core.position();
        position.x < bounds.left - self.despawn_margin
            || position.x > bounds.right() + self.despawn_margin
            || position.y < bounds.top - self.despawn_margin
            || position.y > bounds.bottom() + self.despawn_margin
    }
}

impl Updatable<ShooterEvent> for Meteor {
    fn on_update(&mut self, core: &mut EntityCore, world: &mut World<ShooterEvent>) -> HookResult {
        if self.blink_timer > 0.0 {
            self.blink_timer -= world.delta_time();
            if self.blink_timer <= 0.0 {
                self.blink_timer = 0.0;
                core.set_visible(true);
            }
        }

        if self.out_of_play(core, world) {
            log::trace!("Meteor {} left the level", core.id());
            world.unregister(core.id());
        }
        Ok(())
    }
}

impl Drawable for Meteor {
    fn draw(&self, core: &EntityCore, surface: &mut dyn Surface) {
        surface.draw_sprite(&self.kind.sprite(), core.position(), core.rotation());
    }

    fn hitbox_color(&self) -> Color {
        Color::RED
    }
}

impl CollisionResponder<ShooterEvent> for Meteor {
    fn on_collide(&mut self, core: &mut EntityCore, other: &EntityCore, world: &mut World<ShooterEvent>) -> bool {
        if !other.is(MISSILE) {
            return false;
        }
        self.take_damage(core, self.missile_damage, world);
        true
    }
}

impl EventListener<ShooterEvent> for Meteor {
    fn on_game_event(&mut self, core: &mut EntityCore, event: &ShooterEvent, _world: &mut World<ShooterEvent>) -> bool {
        if let ShooterEvent::GameOver = event {
            core.set_velocity(Vec2::zeros());
            core.set_rotation(core.rotation(), 0.0);
            return true;
        }
        false
    }
}

//! Player missile

use crate::config::MissileConfig;
use crate::entities::{METEOR, MISSILE};
use crate::events::ShooterEvent;
use arcade_engine::foundation::math::Vec2;
use arcade_engine::render::{Color, Surface};
use arcade_engine::scene::{
    CollisionResponder, Drawable, Entity, EntityCore, EntityError, EventListener, Hitbox,
    HookResult, Updatable, World,
};

/// Missile flying straight up until it hits something or leaves the level
#[derive(Debug, Clone)]
pub struct Missile {
    damage: u32,
    blast_radius: f32,
    has_hit: bool,
}

impl Missile {
    /// Missile entity launched from `origin`
    pub fn spawn(config: &MissileConfig, origin: Vec2) -> Result<Entity<ShooterEvent>, EntityError> {
        let core = EntityCore::new(MISSILE, origin)
            .with_velocity(Vec2::new(0.0, -config.speed))
            .with_hitbox(Hitbox::new(config.width, config.height)?);
        let missile = Self {
            damage: config.damage,
            blast_radius: config.blast_radius,
            has_hit: false,
        };
        Ok(Entity::new(core, missile))
    }

    /// Hit points removed from a meteor on impact
    pub fn damage(&self) -> u32 {
        self.damage
    }

    /// Whether the missile already struck a meteor
    pub fn has_hit(&self) -> bool {
        self.has_hit
    }

    fn retire(&self, core: &mut EntityCore, world: &mut World<ShooterEvent>) {
        if core.is_destroyed() {
            return;
        }
        core.destroy();
        world.emit(ShooterEvent::MissileDestroyed { missile: core.id() });
    }
}

impl Updatable<ShooterEvent> for Missile {
    fn on_update(&mut self, core: &mut EntityCore, world: &mut World<ShooterEvent>) -> HookResult {
        let gone = core.hitbox_rect().map_or(core.position().y < 0.0, |rect| rect.bottom() <= 0.0);
        if gone {
            log::trace!("Missile {} left the level", core.id());
            self.retire(core, world);
        }
        Ok(())
    }
}

impl Drawable for Missile {
    fn draw(&self, core: &EntityCore, surface: &mut dyn Surface) {
        surface.draw_sprite("missile", core.position(), 0.0);
    }

    fn hitbox_color(&self) -> Color {
        Color::CYAN
    }
}

impl CollisionResponder<ShooterEvent> for Missile {
    fn on_collide(&mut self, core: &mut EntityCore, other: &EntityCore, world: &mut World<ShooterEvent>) -> bool {
        if self.has_hit || !other.is(METEOR) {
            return false;
        }
        self.has_hit = true;
        self.retire(core, world);
        true
    }
}

impl EventListener<ShooterEvent> for Missile {
    fn on_game_event(&mut self, core: &mut EntityCore, event: &ShooterEvent, world: &mut World<ShooterEvent>) -> bool {
        match event {
            ShooterEvent::GameOver => {
                self.retire(core, world);
                true
            }
            ShooterEvent::MeteorDestroyed(destroyed) => {
                let distance = core.distance_to(Vec2::new(destroyed.x, destroyed.y));
                if distance < self.blast_radius {
                    self.retire(core, world);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

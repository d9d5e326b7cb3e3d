//! Player ship

use crate::config::PlayerConfig;
use crate::entities::{METEOR, PLAYER};
use crate::events::ShooterEvent;
use arcade_engine::foundation::math::Vec2;
use arcade_engine::input::{InputState, KeyCode};
use arcade_engine::render::{Color, Surface};
use arcade_engine::scene::{
    CollisionResponder, Drawable, Entity, EntityCore, EntityError, EventListener, Hitbox,
    HookResult, Updatable, World,
};

/// Player-controlled ship
#[derive(Debug, Clone)]
pub struct PlayerShip {
    lives: u32,
    score: u32,
    speed: f32,
    half_width: f32,
    fire_delay: f32,
    cooldown: f32,
    damage_time: f32,
    invincible: f32,
    blink_interval: f32,
    blink_timer: f32,
    game_over: bool,
}

impl PlayerShip {
    /// Behavior with full lives and no score
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            lives: config.lives,
            score: 0,
            speed: config.speed,
            half_width: config.width / 2.0,
            fire_delay: config.fire_delay,
            cooldown: 0.0,
            damage_time: config.damage_time,
            invincible: 0.0,
            blink_interval: config.blink_interval,
            blink_timer: 0.0,
            game_over: false,
        }
    }

    /// Ship entity centred horizontally near the bottom of the level
    pub fn spawn(config: &PlayerConfig, level: (u32, u32)) -> Result<Entity<ShooterEvent>, EntityError> {
        let position = Vec2::new(level.0 as f32 / 2.0, level.1 as f32 - config.bottom_margin);
        let core = EntityCore::new(PLAYER, position).with_hitbox(Hitbox::new(config.width, config.height)?);
        Ok(Entity::new(core, Self::new(config)))
    }

    /// Lives left
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds of invincibility left
    pub fn invincibility(&self) -> f32 {
        self.invincible
    }

    /// Apply held keys: steer inside the level and report whether to fire
    ///
    /// Returns the launch point when a missile should be fired this frame.
    pub fn steer(&mut self, core: &mut EntityCore, input: &InputState, level_width: f32) -> Option<Vec2> {
        if self.game_over {
            return None;
        }

        let x = core.position().x;
        let velocity = if input.is_held(KeyCode::Left) && x - self.half_width > 0.0 {
            -self.speed
        } else if input.is_held(KeyCode::Right) && x + self.half_width < level_width {
            self.speed
        } else {
            0.0
        };
        core.set_velocity(Vec2::new(velocity, 0.0));

        if input.is_held(KeyCode::Space) && self.cooldown <= 0.0 {
            self.cooldown = self.fire_delay;
            let rect = core.hitbox_rect()?;
            return Some(Vec2::new(rect.center().x, rect.top));
        }
        None
    }

    /// Lose a life unless invincible; returns whether damage was taken
    pub fn take_damage(&mut self, core: &mut EntityCore) -> bool {
        if self.invincible > 0.0 || self.game_over || self.lives == 0 {
            return false;
        }
        self.lives -= 1;
        self.invincible = self.damage_time;
        self.blink_timer = self.blink_interval;
        core.set_visible(false);
        true
    }
}

impl Updatable<ShooterEvent> for PlayerShip {
    fn on_update(&mut self, core: &mut EntityCore, world: &mut World<ShooterEvent>) -> HookResult {
        let dt = world.delta_time();
        self.cooldown = (self.cooldown - dt).max(0.0);

        if self.invincible > 0.0 {
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
        } else if !core.is_visible() {
            core.set_visible(true);
        }

        // Keep the ship inside the level even when a step overshoots
        let (level_width, _) = world.level_size();
        let x = core.position().x.clamp(self.half_width, (level_width as f32 - self.half_width).max(self.half_width));
        if x != core.position().x {
            core.set_position(Vec2::new(x, core.position().y));
            core.set_velocity(Vec2::zeros());
        }
        Ok(())
    }
}

impl Drawable for PlayerShip {
    fn draw(&self, core: &EntityCore, surface: &mut dyn Surface) {
        surface.draw_sprite("spaceship", core.position(), core.rotation());
        if self.invincible > 0.0 {
            surface.draw_sprite("damage", core.position(), 0.0);
        }
    }

    fn hitbox_color(&self) -> Color {
        Color::GREEN
    }
}

impl CollisionResponder<ShooterEvent> for PlayerShip {
    fn on_collide(&mut self, core: &mut EntityCore, other: &EntityCore, world: &mut World<ShooterEvent>) -> bool {
        if !other.is(METEOR) || !self.take_damage(core) {
            return false;
        }
        log::info!("Player hit, {} lives left", self.lives);
        world.emit(ShooterEvent::PlayerHit { lives: self.lives });
        true
    }
}

impl EventListener<ShooterEvent> for PlayerShip {
    fn on_game_event(&mut self, core: &mut EntityCore, event: &ShooterEvent, _world: &mut World<ShooterEvent>) -> bool {
        match event {
            ShooterEvent::ScoreAwarded { points } => {
                self.score += points;
                true
            }
            ShooterEvent::GameOver => {
                self.game_over = true;
                self.invincible = 0.0;
                core.set_visible(true);
                core.set_velocity(Vec2::zeros());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_engine::input::InputEvent;
    use approx::assert_relative_eq;

    fn setup() -> (World<ShooterEvent>, arcade_engine::scene::EntityId) {
        let mut world = World::new(400, 300);
        let entity = PlayerShip::spawn(&PlayerConfig::default(), (400, 300)).unwrap();
        let id = entity.id();
        world.register(entity);
        (world, id)
    }

    fn held(keys: &[KeyCode]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.apply(&InputEvent::KeyDown(*key));
        }
        input
    }

    fn steer(world: &mut World<ShooterEvent>, id: arcade_engine::scene::EntityId, input: &InputState) -> Option<Vec2> {
        let entity = world.entity_mut(id).unwrap();
        let Entity { core, behavior } = entity;
        let ship = behavior.as_any_mut().downcast_mut::<PlayerShip>().unwrap();
        ship.steer(core, input, 400.0)
    }

    #[test]
    fn test_spawn_position() {
        let (world, id) = setup();
        let core = world.core(id).unwrap();
        assert_relative_eq!(core.position().x, 200.0);
        assert_relative_eq!(core.position().y, 250.0);
    }

    #[test]
    fn test_steering_and_edges() {
        let (mut world, id) = setup();
        steer(&mut world, id, &held(&[KeyCode::Left]));
        assert_relative_eq!(world.core(id).unwrap().velocity().x, -250.0);

        world.core_mut(id).unwrap().set_position(Vec2::new(20.0, 250.0));
        steer(&mut world, id, &held(&[KeyCode::Left]));
        assert_relative_eq!(world.core(id).unwrap().velocity().x, 0.0);

        steer(&mut world, id, &held(&[KeyCode::Right]));
        assert_relative_eq!(world.core(id).unwrap().velocity().x, 250.0);
    }

    #[test]
    fn test_fire_cooldown() {
        let (mut world, id) = setup();
        let fire = held(&[KeyCode::Space]);
        let origin = steer(&mut world, id, &fire).unwrap();
        assert_relative_eq!(origin.x, 200.0);
        assert_relative_eq!(origin.y, 230.0);
        assert!(steer(&mut world, id, &fire).is_none());

        world.set_delta_time(0.5);
        world.update_entities();
        assert!(steer(&mut world, id, &fire).is_some());
    }

    #[test]
    fn test_damage_then_invincible_blink() {
        let (mut world, id) = setup();
        let ship = world.behavior_mut::<PlayerShip>(id).unwrap();
        let mut core = EntityCore::new(PLAYER, Vec2::zeros());
        assert!(ship.take_damage(&mut core));
        assert!(!ship.take_damage(&mut core));
        assert_eq!(ship.lives(), 2);
        assert!(!core.is_visible());
    }

    #[test]
    fn test_invincibility_expires_visible() {
        let (mut world, id) = setup();
        {
            let Entity { core, behavior } = world.entity_mut(id).unwrap();
            let ship = behavior.as_any_mut().downcast_mut::<PlayerShip>().unwrap();
            ship.take_damage(core);
        }
        world.set_delta_time(0.1);
        for _ in 0..25 {
            world.update_entities();
        }
        assert!(world.core(id).unwrap().is_visible());
        assert_relative_eq!(world.behavior::<PlayerShip>(id).unwrap().invincibility(), 0.0);
    }

    #[test]
    fn test_score_and_game_over_events() {
        let (mut world, id) = setup();
        world.emit(ShooterEvent::ScoreAwarded { points: 30 });
        world.emit(ShooterEvent::GameOver);
        let ship = world.behavior::<PlayerShip>(id).unwrap();
        assert_eq!(ship.score(), 30);
        assert!(steer(&mut world, id, &held(&[KeyCode::Space])).is_none());
    }
}

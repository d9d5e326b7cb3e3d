//! Space-Shooter game: session flow, input and HUD

use crate::config::ShooterConfig;
use crate::entities::PlayerShip;
use crate::events::ShooterEvent;
use crate::rules::ShooterRules;
use crate::spawner::MeteorSpawner;
use arcade_engine::foundation::math::Vec2;
use arcade_engine::input::{InputEvent, InputState, KeyCode};
use arcade_engine::render::{Color, Surface};
use arcade_engine::scene::{Entity, EntityId, World};
use arcade_engine::{Game, GameError};

/// The Space-Shooter game
pub struct SpaceShooter {
    config: ShooterConfig,
    spawner: MeteorSpawner,
    player: Option<EntityId>,
    game_over: bool,
    sessions: u32,
}

impl SpaceShooter {
    /// Game with an entropy-seeded meteor spawner
    pub fn new(config: ShooterConfig) -> Result<Self, GameError> {
        let spawner = MeteorSpawner::from_entropy(config.meteors.clone(), config.missile.damage)?;
        Ok(Self::with_spawner(config, spawner))
    }

    /// Game using the given spawner
    pub fn with_spawner(config: ShooterConfig, spawner: MeteorSpawner) -> Self {
        Self {
            config,
            spawner,
            player: None,
            game_over: false,
            sessions: 0,
        }
    }

    /// Id of the local player's ship
    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    /// The player ran out of lives
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Sessions started, restarts included
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    /// Current score of the local player
    pub fn score(&self, world: &World<ShooterEvent>) -> u32 {
        self.ship(world).map_or(0, PlayerShip::score)
    }

    /// Lives left for the local player
    pub fn lives(&self, world: &World<ShooterEvent>) -> u32 {
        self.ship(world).map_or(0, PlayerShip::lives)
    }

    fn ship<'w>(&self, world: &'w World<ShooterEvent>) -> Option<&'w PlayerShip> {
        self.player.and_then(|id| world.behavior::<PlayerShip>(id))
    }

    fn start_session(&mut self, world: &mut World<ShooterEvent>) -> Result<(), GameError> {
        world.clear();
        world.set_event_handler(Box::new(ShooterRules::new(self.config.clone())));

        let ship = PlayerShip::spawn(&self.config.player, world.level_size())?;
        self.player = Some(ship.id());
        world.register(ship);

        self.spawner.reset();
        self.spawner.spawn(world)?;
        self.game_over = false;
        self.sessions += 1;
        log::info!("Session {} started", self.sessions);
        Ok(())
    }
}

impl Game for SpaceShooter {
    type Event = ShooterEvent;

    fn init(&mut self, world: &mut World<ShooterEvent>) -> Result<(), GameError> {
        log::info!("Initializing Space Shooter...");
        self.start_session(world)
    }

    fn on_input_event(&mut self, world: &mut World<ShooterEvent>, event: &InputEvent) -> Result<(), GameError> {
        if !self.game_over {
            return Ok(());
        }
        match event {
            InputEvent::KeyDown(KeyCode::Y) => {
                log::info!("Restarting");
                self.start_session(world)?;
            }
            InputEvent::KeyDown(KeyCode::N) => world.request_quit(),
            _ => {}
        }
        Ok(())
    }

    fn on_continuous_input(&mut self, world: &mut World<ShooterEvent>, input: &InputState) -> Result<(), GameError> {
        if self.game_over {
            return Ok(());
        }
        let Some(id) = self.player else {
            return Ok(());
        };
        let level_width = world.level_size().0 as f32;
        let Some(Entity { core, behavior }) = world.entity_mut(id) else {
            return Ok(());
        };
        let Some(ship) = behavior.as_any_mut().downcast_mut::<PlayerShip>() else {
            return Err(GameError::GameLogic(format!("entity {id} is not a player ship")));
        };
        if let Some(origin) = ship.steer(core, input, level_width) {
            world.emit(ShooterEvent::PlayerFireMissile { x: origin.x, y: origin.y });
        }
        Ok(())
    }

    fn on_update(&mut self, world: &mut World<ShooterEvent>) -> Result<(), GameError> {
        if self.game_over {
            return Ok(());
        }
        self.spawner.tick(world.delta_time(), world)?;

        if self.lives(world) == 0 {
            self.game_over = true;
            log::info!("Game over, score {}", self.score(world));
            world.emit(ShooterEvent::GameOver);
        }
        Ok(())
    }

    fn render_background(&mut self, world: &World<ShooterEvent>, surface: &mut dyn Surface) -> Result<(), GameError> {
        let (width, height) = world.level_size();
        surface.draw_sprite("background", Vec2::new(width as f32 / 2.0, height as f32 / 2.0), 0.0);
        Ok(())
    }

    fn render_foreground(&mut self, world: &World<ShooterEvent>, surface: &mut dyn Surface) -> Result<(), GameError> {
        surface.draw_text(&format!("Score: {}", self.score(world)), Vec2::new(10.0, 10.0), Color::WHITE);
        surface.draw_text(&format!("Lives: {}", self.lives(world)), Vec2::new(10.0, 30.0), Color::WHITE);

        if self.game_over {
            let (width, height) = world.level_size();
            let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
            surface.draw_text("GAME OVER", Vec2::new(center.x - 45.0, center.y - 20.0), Color::RED);
            surface.draw_text("Play again? (Y/N)", Vec2::new(center.x - 80.0, center.y + 10.0), Color::WHITE);
        }
        Ok(())
    }

    fn cleanup(&mut self, world: &mut World<ShooterEvent>) -> Result<(), GameError> {
        log::info!("Final score: {} after {} session(s)", self.score(world), self.sessions);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MeteorColor, MeteorKind, MeteorSize};
    use crate::entities::meteor::Meteor;
    use crate::entities::{Missile, METEOR, MISSILE, PLAYER};
    use arcade_engine::backend::HeadlessPlatform;
    use arcade_engine::physics::{CollisionDetector, CollisionPolicy};
    use arcade_engine::scene::{EntityCore, Hitbox};
    use arcade_engine::Engine;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game(config: &ShooterConfig) -> SpaceShooter {
        let spawner = MeteorSpawner::new(config.meteors.clone(), config.missile.damage, StdRng::seed_from_u64(3)).unwrap();
        SpaceShooter::with_spawner(config.clone(), spawner)
    }

    #[test]
    fn test_missile_destroys_meteor_end_to_end() {
        let config = ShooterConfig::default();
        let mut world = World::new(400, 300);
        let mut shooter = game(&config);
        shooter.init(&mut world).unwrap();
        for id in world.get_by_type(METEOR) {
            world.unregister(id);
        }

        let kind = MeteorKind::new(MeteorSize::Small, MeteorColor::Brown, 1);
        let core = EntityCore::new(METEOR, Vec2::new(50.0, 50.0)).with_hitbox(Hitbox::new(10.0, 10.0).unwrap());
        let meteor = Entity::new(core, Meteor::new(kind, &config.meteors, 1).with_hp(1));
        let meteor_id = meteor.id();
        world.register(meteor);
        world.register(Missile::spawn(&config.missile, Vec2::new(52.0, 52.0)).unwrap());

        let report = CollisionDetector::new(CollisionPolicy::AllPairs).run(&mut world);
        assert_eq!(report.overlaps.len(), 1);

        world.collect_destroyed();
        assert!(!world.get_all().contains(&meteor_id));
        assert_eq!(world.count_by_type(MISSILE), 0);
        assert_eq!(shooter.score(&world), 10);
    }

    #[test]
    fn test_missile_damages_every_overlapping_meteor() {
        let config = ShooterConfig::default();
        let mut world = World::new(400, 300);
        world.set_event_handler(Box::new(ShooterRules::new(config.clone())));

        let kind = MeteorKind::new(MeteorSize::Big, MeteorColor::Grey, 1);
        let mut meteors = Vec::new();
        for x in [45.0, 55.0] {
            let core = EntityCore::new(METEOR, Vec2::new(x, 50.0)).with_hitbox(Hitbox::new(10.0, 10.0).unwrap());
            let meteor = Entity::new(core, Meteor::new(kind, &config.meteors, 1).with_hp(5));
            meteors.push(meteor.id());
            world.register(meteor);
        }
        world.register(Missile::spawn(&config.missile, Vec2::new(50.0, 50.0)).unwrap());

        let report = CollisionDetector::new(CollisionPolicy::AllPairs).run(&mut world);
        assert_eq!(report.overlaps.len(), 2);
        let hp: Vec<u32> = meteors.iter().map(|id| world.behavior::<Meteor>(*id).unwrap().hp()).collect();
        assert_eq!(hp, vec![4, 4]);
    }

    #[test]
    fn test_init_spawns_player_and_meteor() {
        let config = ShooterConfig::default();
        let mut world = World::new(400, 300);
        let mut shooter = game(&config);
        shooter.init(&mut world).unwrap();
        assert_eq!(world.count_by_type(PLAYER), 1);
        assert_eq!(world.count_by_type(METEOR), 1);
        assert_eq!(shooter.lives(&world), 3);
    }

    #[test]
    fn test_fire_through_continuous_input() {
        let config = ShooterConfig::default();
        let mut world = World::new(400, 300);
        let mut shooter = game(&config);
        shooter.init(&mut world).unwrap();

        let mut input = InputState::new();
        input.apply(&InputEvent::KeyDown(KeyCode::Space));
        shooter.on_continuous_input(&mut world, &input).unwrap();
        shooter.on_continuous_input(&mut world, &input).unwrap();
        assert_eq!(world.count_by_type(MISSILE), 1);
    }

    #[test]
    fn test_game_over_and_restart() {
        let config = ShooterConfig::default();
        let mut world = World::new(400, 300);
        let mut shooter = game(&config);
        shooter.init(&mut world).unwrap();

        let player = shooter.player().unwrap();
        world.set_delta_time(2.5);
        for _ in 0..3 {
            let Some(Entity { core, behavior }) = world.entity_mut(player) else {
                panic!("player missing");
            };
            let ship = behavior.as_any_mut().downcast_mut::<PlayerShip>().unwrap();
            assert!(ship.take_damage(core));
            world.update_entities();
        }
        assert_eq!(shooter.lives(&world), 0);
        shooter.on_update(&mut world).unwrap();
        assert!(shooter.is_game_over());

        shooter.on_input_event(&mut world, &InputEvent::KeyDown(KeyCode::Y)).unwrap();
        assert!(!shooter.is_game_over());
        assert_eq!(shooter.sessions(), 2);
        assert_eq!(shooter.lives(&world), 3);
    }

    #[test]
    fn test_quit_at_game_over() {
        let config = ShooterConfig::default();
        let mut world = World::new(400, 300);
        let mut shooter = game(&config);
        shooter.init(&mut world).unwrap();

        shooter.on_input_event(&mut world, &InputEvent::KeyDown(KeyCode::N)).unwrap();
        assert!(!world.quit_requested());

        shooter.game_over = true;
        shooter.on_input_event(&mut world, &InputEvent::KeyDown(KeyCode::N)).unwrap();
        assert!(world.quit_requested());
    }

    #[test]
    fn test_headless_run_draws_hud() {
        let config = ShooterConfig::default();
        let platform = HeadlessPlatform::new().with_frame_limit(5);
        let mut engine = Engine::new(config.engine.clone(), game(&config), platform).unwrap();
        engine.run().unwrap();

        assert_eq!(engine.platform().frames_presented(), 5);
        assert!(engine.platform().recording().texts().contains(&"Score: 0"));
        assert!(engine.platform().recording().sprites().contains(&"background"));
    }
}

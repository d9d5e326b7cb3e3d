//! Game rules installed as the engine-level event handler

use crate::config::ShooterConfig;
use crate::entities::meteor::{Meteor, MeteorLaunch};
use crate::entities::{Missile, OtherMissile, OtherPlayer, METEOR, PLAYER};
use crate::events::{RemoteEvent, ShooterEvent};
use arcade_engine::events::EventHandler;
use arcade_engine::foundation::math::Vec2;
use arcade_engine::scene::{EntityId, World};

/// Turns requests into entities and relays score
#[derive(Debug, Clone)]
pub struct ShooterRules {
    config: ShooterConfig,
}

impl ShooterRules {
    /// Rules using `config` for everything they spawn
    pub fn new(config: ShooterConfig) -> Self {
        Self { config }
    }

    fn fire_missile(&self, x: f32, y: f32, world: &mut World<ShooterEvent>) -> bool {
        match Missile::spawn(&self.config.missile, Vec2::new(x, y)) {
            Ok(missile) => {
                world.register(missile);
                world.emit(ShooterEvent::MissileFired { x, y });
                true
            }
            Err(e) => {
                log::error!("Failed to spawn missile: {}", e);
                false
            }
        }
    }

    fn apply_remote(&self, event: &RemoteEvent, world: &mut World<ShooterEvent>) -> bool {
        match event {
            RemoteEvent::PlayerConnected { player_id, name } => {
                match OtherPlayer::spawn(*player_id, name.clone(), &self.config.player, world.level_size()) {
                    Ok(entity) => {
                        log::info!("Player {} ({}) joined", name, player_id);
                        world.register(entity)
                    }
                    Err(e) => {
                        log::error!("Failed to mirror player {}: {}", player_id, e);
                        false
                    }
                }
            }
            RemoteEvent::PlayerDisconnected { player_id } => {
                log::info!("Player {} left", player_id);
                world.unregister(OtherPlayer::entity_id(*player_id))
            }
            RemoteEvent::PlayerPosition { player_id, x, y, speed_x, speed_y } => {
                let Some(core) = world.core_mut(OtherPlayer::entity_id(*player_id)) else {
                    log::debug!("Position for unknown player {}", player_id);
                    return false;
                };
                core.set_position(Vec2::new(*x, *y));
                core.set_velocity(Vec2::new(*speed_x, *speed_y));
                true
            }
            RemoteEvent::MissileFired { player_id, missile_id, x, y } => {
                let missile = OtherMissile::spawn(*player_id, *missile_id, Vec2::new(*x, *y), &self.config.missile);
                world.register(missile)
            }
            RemoteEvent::MeteorCreated { meteor_id, kind, x, y, speed_x, speed_y, spin } => {
                let launch = MeteorLaunch {
                    position: Vec2::new(*x, *y),
                    velocity: Vec2::new(*speed_x, *speed_y),
                    spin: *spin,
                };
                match Meteor::spawn_remote(*meteor_id, *kind, launch, &self.config.meteors, self.config.missile.damage) {
                    Ok(meteor) => world.register(meteor),
                    Err(e) => {
                        log::error!("Failed to mirror meteor {}: {}", meteor_id, e);
                        false
                    }
                }
            }
            RemoteEvent::MeteorDestroyed { meteor_id, player_id } => {
                log::debug!("Meteor {} destroyed by player {}", meteor_id, player_id);
                world.unregister(EntityId::remote(METEOR, *meteor_id))
            }
            RemoteEvent::ScoreUpdate { player_id, score_delta } => {
                match world.behavior_mut::<OtherPlayer>(OtherPlayer::entity_id(*player_id)) {
                    Some(player) => {
                        player.add_score(*score_delta);
                        true
                    }
                    None => false,
                }
            }
            // The mirrored ship reacts to its own hits
            RemoteEvent::PlayerHit { .. } => false,
        }
    }
}

impl EventHandler<ShooterEvent> for ShooterRules {
    fn on_game_event(&mut self, event: &ShooterEvent, world: &mut World<ShooterEvent>) -> bool {
        match event {
            ShooterEvent::PlayerFireMissile { x, y } => self.fire_missile(*x, *y, world),
            ShooterEvent::MeteorDestroyed(destroyed) => {
                world.emit_to(ShooterEvent::ScoreAwarded { points: destroyed.points }, PLAYER);
                true
            }
            ShooterEvent::Remote(remote) => self.apply_remote(remote, world),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MeteorColor, MeteorKind, MeteorSize};
    use crate::entities::{PlayerShip, MISSILE, OTHER_MISSILE, OTHER_PLAYER};
    use crate::events::MeteorDestroyed;
    use approx::assert_relative_eq;

    fn world() -> World<ShooterEvent> {
        let mut world = World::new(400, 300);
        world.set_event_handler(Box::new(ShooterRules::new(ShooterConfig::default())));
        world
    }

    #[test]
    fn test_fire_registers_missile() {
        let mut world = world();
        world.emit(ShooterEvent::PlayerFireMissile { x: 100.0, y: 200.0 });
        assert_eq!(world.count_by_type(MISSILE), 1);
        let id = world.get_by_type(MISSILE)[0];
        assert_relative_eq!(world.core(id).unwrap().velocity().y, -500.0);
    }

    #[test]
    fn test_score_goes_to_player_only() {
        let mut world = world();
        let player = PlayerShip::spawn(&ShooterConfig::default().player, (400, 300)).unwrap();
        let id = player.id();
        world.register(player);
        world.emit(ShooterEvent::MeteorDestroyed(MeteorDestroyed {
            points: 20,
            x: 0.0,
            y: 0.0,
            meteor: EntityId::remote(METEOR, 3),
        }));
        assert_eq!(world.behavior::<PlayerShip>(id).unwrap().score(), 20);
    }

    #[test]
    fn test_remote_player_lifecycle() {
        let mut world = world();
        let remote = |event| ShooterEvent::Remote(event);
        world.emit(remote(RemoteEvent::PlayerConnected { player_id: 4, name: "ana".to_string() }));
        assert_eq!(world.count_by_type(OTHER_PLAYER), 1);

        world.emit(remote(RemoteEvent::PlayerPosition { player_id: 4, x: 10.0, y: 20.0, speed_x: 5.0, speed_y: 0.0 }));
        let core = world.core(OtherPlayer::entity_id(4)).unwrap();
        assert_relative_eq!(core.position().x, 10.0);
        assert_relative_eq!(core.velocity().x, 5.0);

        world.emit(remote(RemoteEvent::ScoreUpdate { player_id: 4, score_delta: 30 }));
        assert_eq!(world.behavior::<OtherPlayer>(OtherPlayer::entity_id(4)).unwrap().score(), 30);

        world.emit(remote(RemoteEvent::MissileFired { player_id: 4, missile_id: 1, x: 10.0, y: 20.0 }));
        assert_eq!(world.count_by_type(OTHER_MISSILE), 1);

        world.emit(remote(RemoteEvent::PlayerDisconnected { player_id: 4 }));
        assert_eq!(world.count_by_type(OTHER_PLAYER), 0);
    }

    #[test]
    fn test_remote_meteor_created_and_destroyed() {
        let mut world = world();
        let kind = MeteorKind::new(MeteorSize::Small, MeteorColor::Grey, 2);
        world.emit(ShooterEvent::Remote(RemoteEvent::MeteorCreated {
            meteor_id: 12,
            kind,
            x: 100.0,
            y: -20.0,
            speed_x: 0.0,
            speed_y: 60.0,
            spin: 0.0,
        }));
        let id = EntityId::remote(METEOR, 12);
        assert_eq!(world.behavior::<Meteor>(id).unwrap().kind(), kind);

        world.emit(ShooterEvent::Remote(RemoteEvent::MeteorDestroyed { meteor_id: 12, player_id: 4 }));
        assert!(!world.contains(id));
    }
}

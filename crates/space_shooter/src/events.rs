//! Game events exchanged on the engine's event bus

use crate::catalog::MeteorKind;
use arcade_engine::scene::EntityId;

/// Everything the Space-Shooter emits
#[derive(Debug, Clone, PartialEq)]
pub enum ShooterEvent {
    /// The player wants a missile launched from `(x, y)`
    PlayerFireMissile {
        /// Launch x
        x: f32,
        /// Launch y
        y: f32,
    },
    /// A missile was registered
    MissileFired {
        /// Launch x
        x: f32,
        /// Launch y
        y: f32,
    },
    /// A missile left play
    MissileDestroyed {
        /// The missile
        missile: EntityId,
    },
    /// A meteor reached zero hp
    MeteorDestroyed(MeteorDestroyed),
    /// Points for the player
    ScoreAwarded {
        /// Points to add
        points: u32,
    },
    /// The local player lost a life
    PlayerHit {
        /// Lives left
        lives: u32,
    },
    /// The local player has no lives left
    GameOver,
    /// Relayed from the server
    Remote(RemoteEvent),
}

/// Payload of [`ShooterEvent::MeteorDestroyed`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorDestroyed {
    /// Score value of the meteor
    pub points: u32,
    /// Where it was destroyed
    pub x: f32,
    /// Where it was destroyed
    pub y: f32,
    /// The meteor
    pub meteor: EntityId,
}

/// Events received from the multiplayer relay
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteEvent {
    /// Another player joined
    PlayerConnected {
        /// Server-assigned id
        player_id: u64,
        /// Display name
        name: String,
    },
    /// Another player left
    PlayerDisconnected {
        /// Server-assigned id
        player_id: u64,
    },
    /// Another player's ship moved
    PlayerPosition {
        /// Server-assigned id
        player_id: u64,
        /// Position x
        x: f32,
        /// Position y
        y: f32,
        /// Velocity x
        speed_x: f32,
        /// Velocity y
        speed_y: f32,
    },
    /// Another player was hit by a meteor
    PlayerHit {
        /// Server-assigned id
        player_id: u64,
        /// Lives left
        lives: u32,
    },
    /// Another player fired
    MissileFired {
        /// Shooter
        player_id: u64,
        /// Server-assigned missile id
        missile_id: u64,
        /// Launch x
        x: f32,
        /// Launch y
        y: f32,
    },
    /// The server spawned a shared meteor
    MeteorCreated {
        /// Server-assigned meteor id
        meteor_id: u64,
        /// Kind
        kind: MeteorKind,
        /// Position x
        x: f32,
        /// Position y
        y: f32,
        /// Velocity x
        speed_x: f32,
        /// Velocity y
        speed_y: f32,
        /// Spin (degrees per second)
        spin: f32,
    },
    /// The server removed a shared meteor
    MeteorDestroyed {
        /// Server-assigned meteor id
        meteor_id: u64,
        /// Player credited with the kill
        player_id: u64,
    },
    /// Another player's score changed
    ScoreUpdate {
        /// Server-assigned id
        player_id: u64,
        /// Change in score
        score_delta: i64,
    },
}

//! Game entities and their type tags

pub mod meteor;
pub mod missile;
pub mod player;
pub mod remote;

pub use meteor::Meteor;
pub use missile::Missile;
pub use player::PlayerShip;
pub use remote::{OtherMissile, OtherPlayer};

use arcade_engine::scene::TypeTag;

/// The local player's ship
pub const PLAYER: TypeTag = TypeTag::new("player");
/// Falling meteors, local or server-spawned
pub const METEOR: TypeTag = TypeTag::new("meteor");
/// Missiles fired by the local player
pub const MISSILE: TypeTag = TypeTag::new("missile");
/// Mirror of another player's ship
pub const OTHER_PLAYER: TypeTag = TypeTag::new("other_player");
/// Mirror of another player's missile
pub const OTHER_MISSILE: TypeTag = TypeTag::new("other_missile");

//! # Space Shooter
//!
//! Dodge and shoot falling meteors. Built on `arcade_engine`: the ship,
//! missiles and meteors are entities with their own hooks, the rules sit in
//! the engine's event handler, and other players arrive as relay events.

#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod entities;
pub mod events;
pub mod game;
pub mod rules;
pub mod spawner;

pub use config::ShooterConfig;
pub use events::{RemoteEvent, ShooterEvent};
pub use game::SpaceShooter;

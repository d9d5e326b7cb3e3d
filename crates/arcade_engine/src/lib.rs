//! # Arcade Engine
//!
//! A small engine for 2D arcade games: an object registry with type-indexed
//! lookup, hitbox collision, a synchronous event bus and a fixed-order game
//! loop.
//!
//! ## Features
//!
//! - **Object registry**: registration, type index, nearest-neighbour and
//!   predicate queries, snapshot iteration
//! - **Capability hooks**: entities implement only the update, draw,
//!   collision and event hooks they need
//! - **Event bus**: a game-defined event enum, engine handler first, then
//!   entities (optionally filtered by type)
//! - **Headless backend**: scripted input and a recording surface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcade_engine::prelude::*;
//!
//! enum Event {
//!     Scored(u32),
//! }
//!
//! struct MyGame;
//!
//! impl Game for MyGame {
//!     type Event = Event;
//!
//!     fn on_update(&mut self, world: &mut World<Event>) -> Result<(), GameError> {
//!         world.emit(Event::Scored(1));
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let platform = HeadlessPlatform::new().with_frame_limit(60);
//!     let mut engine = Engine::new(EngineConfig::default(), MyGame, platform)?;
//!     engine.run()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod physics;
pub mod events;
pub mod input;
pub mod render;
pub mod backend;
pub mod net;

mod game;
mod engine;

pub use engine::{Engine, EngineError, EngineState};
pub use game::{Game, GameError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineError, EngineState, Game, GameError,
        backend::{HeadlessPlatform, Platform, PlatformError},
        config::{Config, ConfigError, EngineConfig},
        events::EventHandler,
        foundation::math::{Rect, Vec2},
        input::{InputEvent, InputState, KeyCode},
        net::{RemoteInbox, RemoteSender},
        physics::{CollisionDetector, CollisionPolicy},
        render::{Color, Surface},
        scene::{
            CollisionResponder, Drawable, Entity, EntityCore, EntityId, EventListener, Hitbox,
            HookResult, Updatable, World, TypeTag,
        },
    };
}

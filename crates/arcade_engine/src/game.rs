//! Game trait and lifecycle hooks

use crate::config::ConfigError;
use crate::input::{InputEvent, InputState};
use crate::render::Surface;
use crate::scene::entity::EntityError;
use crate::scene::world::World;
use thiserror::Error;

/// Game lifecycle trait
///
/// Implement this trait to build a game on the engine. Every hook except
/// the event type has a no-op default.
pub trait Game {
    /// The closed set of events exchanged on the bus
    type Event: 'static;

    /// Called once when the loop starts, before the first frame.
    ///
    /// Register initial entities and install the event handler here. An
    /// error aborts startup.
    fn init(&mut self, _world: &mut World<Self::Event>) -> Result<(), GameError> {
        Ok(())
    }

    /// Discrete input (key presses, focus changes), every frame including paused ones
    fn on_input_event(
        &mut self,
        _world: &mut World<Self::Event>,
        _event: &InputEvent,
    ) -> Result<(), GameError> {
        Ok(())
    }

    /// Held keys, once per unpaused frame
    fn on_continuous_input(
        &mut self,
        _world: &mut World<Self::Event>,
        _input: &InputState,
    ) -> Result<(), GameError> {
        Ok(())
    }

    /// Simulation update, after entity updates and the collision pass
    fn on_update(&mut self, _world: &mut World<Self::Event>) -> Result<(), GameError> {
        Ok(())
    }

    /// Drawn after clearing, before entities
    fn render_background(
        &mut self,
        _world: &World<Self::Event>,
        _surface: &mut dyn Surface,
    ) -> Result<(), GameError> {
        Ok(())
    }

    /// Drawn after entities and the debug overlay
    fn render_foreground(
        &mut self,
        _world: &World<Self::Event>,
        _surface: &mut dyn Surface,
    ) -> Result<(), GameError> {
        Ok(())
    }

    /// Called once during teardown, before the world is cleared
    fn cleanup(&mut self, _world: &mut World<Self::Event>) -> Result<(), GameError> {
        Ok(())
    }
}

/// Game-level errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed entity descriptor
    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}

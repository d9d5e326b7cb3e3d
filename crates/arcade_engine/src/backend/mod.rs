//! Platform abstraction
//!
//! A platform owns the window (or its stand-in), turns OS input into
//! [`InputEvent`]s, provides the drawing surface for a frame and presents it.

pub mod headless;

pub use headless::{DrawCommand, HeadlessPlatform, RecordingSurface};

use crate::config::DisplayConfig;
use crate::input::{InputEvent, InputState};
use crate::render::Surface;
use thiserror::Error;

/// Platform errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// The window or drawing surface could not be created
    #[error("Surface creation failed: {0}")]
    SurfaceCreation(String),

    /// A finished frame could not be shown
    #[error("Present failed: {0}")]
    Present(String),

    /// Used before `open` or after `shutdown`
    #[error("Platform is not open")]
    NotOpen,
}

/// Window, input and presentation backend
///
/// Not `Send`: the engine drives it from a single thread.
pub trait Platform {
    /// Create the window and drawing surface
    fn open(&mut self, display: &DisplayConfig) -> Result<(), PlatformError>;

    /// Whether `open` succeeded and `shutdown` has not been called
    fn is_open(&self) -> bool;

    /// Discrete events since the last poll; also updates the held-key state
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Keys currently held
    fn input_state(&self) -> &InputState;

    /// Drawing target for the current frame
    fn surface(&mut self) -> &mut dyn Surface;

    /// Show the finished frame
    fn present(&mut self) -> Result<(), PlatformError>;

    /// Release the window and surface
    fn shutdown(&mut self);
}

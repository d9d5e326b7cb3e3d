//! Rendering contract
//!
//! The engine never talks to a graphics API directly. Entities and game
//! hooks draw through a [`Surface`], which a backend implements.

pub mod overlay;

pub use overlay::{DebugOverlay, OverlayColors, OverlayStats};

use crate::foundation::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// RGBA colour, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha (255 = opaque)
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque red
    pub const RED: Color = Color::rgb(255, 0, 0);
    /// Opaque green
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    /// Opaque blue
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    /// Opaque yellow
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    /// Opaque cyan
    pub const CYAN: Color = Color::rgb(0, 255, 255);

    /// Opaque colour from components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same colour with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Drawing target for one frame
///
/// Coordinates are window pixels, origin top-left, y down. Rotation is in
/// degrees.
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    /// Draw a named sprite centred at `position`
    fn draw_sprite(&mut self, sprite: &str, position: Vec2, rotation: f32);

    /// Fill a rectangle
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline a rectangle
    fn stroke_rect(&mut self, rect: Rect, color: Color);

    /// Draw a line of text with its top-left corner at `position`
    fn draw_text(&mut self, text: &str, position: Vec2, color: Color);
}

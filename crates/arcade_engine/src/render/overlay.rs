//! Debug overlay: hitboxes and frame statistics
//!
//! Based on Game Engine Architecture 3rd Edition, Section 10.2. Purely
//! additive; drawing the overlay never changes simulation state.

use crate::foundation::math::Vec2;
use crate::render::{Color, Surface};
use crate::scene::world::World;

/// Color scheme for the overlay text
#[derive(Clone, Debug)]
pub struct OverlayColors {
    /// FPS at or near target
    pub fps_ok: Color,
    /// FPS below target
    pub fps_low: Color,
    /// Other statistics
    pub text: Color,
}

impl Default for OverlayColors {
    fn default() -> Self {
        Self {
            fps_ok: Color::GREEN,
            fps_low: Color::RED,
            text: Color::WHITE,
        }
    }
}

/// Numbers shown by the overlay for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlayStats {
    /// Measured frames per second
    pub fps: f32,
    /// Configured target (0 = uncapped)
    pub target_fps: u32,
    /// Clamped delta time in seconds
    pub delta_time: f32,
    /// Window size
    pub window: (u32, u32),
    /// Overlapping pairs found by the last collision pass
    pub collisions: usize,
}

/// Hitbox and statistics overlay
#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    colors: OverlayColors,
}

impl DebugOverlay {
    const LINE_HEIGHT: f32 = 20.0;
    const MARGIN: f32 = 10.0;

    /// Create an overlay with the default colours
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: OverlayColors) -> Self {
        self.colors = colors;
        self
    }

    /// Draw hitboxes of visible entities, then the statistics block
    pub fn draw<E>(&self, world: &World<E>, stats: &OverlayStats, surface: &mut dyn Surface) {
        for entity in world.registry().iter() {
            if entity.core.is_visible() && entity.core.hitbox().is_some() {
                entity.behavior.draw_hitbox(&entity.core, surface);
            }
        }

        let (level_width, level_height) = world.level_size();
        let fps_color = if stats.target_fps == 0 || stats.fps >= stats.target_fps as f32 * 0.95 {
            self.colors.fps_ok
        } else {
            self.colors.fps_low
        };

        let lines = [
            (format!("FPS: {:.1}/{}", stats.fps, stats.target_fps), fps_color),
            (format!("DT: {:.2}ms", stats.delta_time * 1000.0), self.colors.text),
            (
                format!(
                    "Level: {}x{} => Window: {}x{}",
                    level_width, level_height, stats.window.0, stats.window.1
                ),
                self.colors.text,
            ),
            (
                format!("Entities: {}  Collisions: {}", world.entity_count(), stats.collisions),
                self.colors.text,
            ),
        ];
        for (row, (text, color)) in lines.iter().enumerate() {
            let position = Vec2::new(Self::MARGIN, Self::MARGIN + row as f32 * Self::LINE_HEIGHT);
            surface.draw_text(text, position, *color);
        }
    }
}

//! Headless platform: scripted input and a surface that records draw calls

use crate::backend::{Platform, PlatformError};
use crate::config::DisplayConfig;
use crate::foundation::math::{Rect, Vec2};
use crate::input::{InputEvent, InputState};
use crate::render::{Color, Surface};
use std::collections::VecDeque;

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Whole-surface fill
    Clear(Color),
    /// Named sprite
    Sprite {
        /// Sprite name
        sprite: String,
        /// Centre position
        position: Vec2,
        /// Degrees
        rotation: f32,
    },
    /// Filled rectangle
    FillRect {
        /// Area
        rect: Rect,
        /// Fill colour
        color: Color,
    },
    /// Rectangle outline
    StrokeRect {
        /// Area
        rect: Rect,
        /// Line colour
        color: Color,
    },
    /// Text line
    Text {
        /// Content
        text: String,
        /// Top-left corner
        position: Vec2,
        /// Text colour
        color: Color,
    },
}

/// Surface that records draw calls instead of rasterising them
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pending: Vec<DrawCommand>,
    presented: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create a surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Commands recorded since the last present
    pub fn pending(&self) -> &[DrawCommand] {
        &self.pending
    }

    /// Commands of the last presented frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.presented
    }

    /// Text lines of the last presented frame
    pub fn texts(&self) -> Vec<&str> {
        self.presented
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Sprite names of the last presented frame, in draw order
    pub fn sprites(&self) -> Vec<&str> {
        self.presented
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Sprite { sprite, .. } => Some(sprite.as_str()),
                _ => None,
            })
            .collect()
    }

    fn present(&mut self) {
        self.presented = std::mem::take(&mut self.pending);
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.pending.clear();
        self.pending.push(DrawCommand::Clear(color));
    }

    fn draw_sprite(&mut self, sprite: &str, position: Vec2, rotation: f32) {
        self.pending.push(DrawCommand::Sprite {
            sprite: sprite.to_string(),
            position,
            rotation,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.pending.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.pending.push(DrawCommand::StrokeRect { rect, color });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color) {
        self.pending.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            color,
        });
    }
}

/// Platform without a window
///
/// Input comes from a per-frame script; once the script (or the optional
/// frame limit) runs out, a close request is delivered.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    open: bool,
    script: VecDeque<Vec<InputEvent>>,
    close_when_script_ends: bool,
    frame_limit: Option<u64>,
    frames_polled: u64,
    frames_presented: u64,
    input: InputState,
    surface: RecordingSurface,
    open_failure: Option<String>,
    shut_down: bool,
}

impl HeadlessPlatform {
    /// Platform that runs until told to stop
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one batch of events per frame, then request close
    pub fn with_script(mut self, frames: Vec<Vec<InputEvent>>) -> Self {
        self.script = frames.into();
        self.close_when_script_ends = true;
        self
    }

    /// Request close once this many frames have been polled
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Make `open` fail with `reason`
    pub fn with_open_failure(mut self, reason: impl Into<String>) -> Self {
        self.open_failure = Some(reason.into());
        self
    }

    /// Queue a batch of events for a later frame
    pub fn push_frame(&mut self, events: Vec<InputEvent>) {
        self.script.push_back(events);
    }

    /// The recording surface
    pub fn recording(&self) -> &RecordingSurface {
        &self.surface
    }

    /// Frames shown so far
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// `shutdown` has been called
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Platform for HeadlessPlatform {
    fn open(&mut self, display: &DisplayConfig) -> Result<(), PlatformError> {
        if let Some(reason) = &self.open_failure {
            return Err(PlatformError::SurfaceCreation(reason.clone()));
        }
        if display.width == 0 || display.height == 0 {
            return Err(PlatformError::SurfaceCreation(format!(
                "invalid size {}x{}",
                display.width, display.height
            )));
        }
        self.surface = RecordingSurface::new(display.width, display.height);
        self.open = true;
        self.shut_down = false;
        log::info!("Headless platform opened ({}x{}) '{}'", display.width, display.height, display.title);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.frames_polled += 1;
        let mut events = match self.script.pop_front() {
            Some(events) => events,
            None if self.close_when_script_ends => vec![InputEvent::CloseRequested],
            None => Vec::new(),
        };
        if self.frame_limit.is_some_and(|limit| self.frames_polled >= limit) {
            events.push(InputEvent::CloseRequested);
        }
        for event in &events {
            self.input.apply(event);
        }
        events
    }

    fn input_state(&self) -> &InputState {
        &self.input
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.surface
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        if !self.open {
            return Err(PlatformError::NotOpen);
        }
        self.surface.present();
        self.frames_presented += 1;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.open = false;
        self.shut_down = true;
        self.input.clear();
        log::info!("Headless platform shut down after {} frames", self.frames_presented);
    }
}

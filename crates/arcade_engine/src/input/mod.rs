//! Input management
//!
//! The platform layer translates native events into [`InputEvent`]s (discrete,
//! delivered once) and keeps an [`InputState`] of held keys (continuous).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// N key
    N,
    /// P key
    P,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Y key
    Y,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// F1 function key
    F1,
    /// F3 function key
    F3,
}

/// Discrete input-layer events, delivered once per occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Key went down
    KeyDown(KeyCode),
    /// Key went up
    KeyUp(KeyCode),
    /// The window (or the host) asked the game to close
    CloseRequested,
    /// Window gained focus
    Focused,
    /// Window lost focus
    Unfocused,
}

/// Continuous input: which keys are currently held
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a discrete event into the held-key set
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                self.held.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
            // Keys released while unfocused never report KeyUp
            InputEvent::Unfocused => self.held.clear(),
            InputEvent::CloseRequested | InputEvent::Focused => {}
        }
    }

    /// Whether `key` is currently held
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Release every key
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

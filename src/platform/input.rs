//! Keyboard state
//!
//! Key handlers record which keys are held; the frame callback reads them once
//! per tick.

use std::collections::HashSet;

use crate::sim::TickInput;

const LEFT_KEYS: [&str; 2] = ["arrowleft", "a"];
const RIGHT_KEYS: [&str; 2] = ["arrowright", "d"];

/// Held keys, by lowercased `KeyboardEvent.key`
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&key.to_lowercase())
    }

    /// Forget everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: LEFT_KEYS.iter().any(|k| self.held.contains(*k)),
            right: RIGHT_KEYS.iter().any(|k| self.held.contains(*k)),
        }
    }
}

/// Keys whose default action (page scrolling) is suppressed
pub fn is_scroll_key(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "arrowleft" | "arrowright" | "arrowup" | "arrowdown"
    )
}

//! Keyboard Input Module
//!
//! Key codes and held-key tracking, decoupled from winit so game code and
//! tests never touch the windowing system.

use std::collections::HashSet;

/// Generic key codes for the keys the game reacts to.
///
/// These map to standard keyboard keys but are not tied to winit::keyboard::KeyCode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Control keys
    Enter,
    NumpadEnter,
    Space,
    Escape,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Tracks which keys are currently held down.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update held state from a key event.
    ///
    /// Returns `true` only for a fresh press (key was up, now down), so OS
    /// auto-repeat never produces a second key-down.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if key == KeyCode::Unknown {
            return false;
        }
        if pressed {
            self.held.insert(key)
        } else {
            self.held.remove(&key);
            false
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn held(&self) -> &HashSet<KeyCode> {
        &self.held
    }

    /// Release everything (e.g. on focus loss).
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_press_only_once() {
        let mut keyboard = KeyboardState::new();
        assert!(keyboard.handle_key(KeyCode::ArrowLeft, true));
        // Auto-repeat
        assert!(!keyboard.handle_key(KeyCode::ArrowLeft, true));
        assert!(keyboard.is_held(KeyCode::ArrowLeft));

        assert!(!keyboard.handle_key(KeyCode::ArrowLeft, false));
        assert!(!keyboard.is_held(KeyCode::ArrowLeft));
        assert!(keyboard.handle_key(KeyCode::ArrowLeft, true));
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut keyboard = KeyboardState::new();
        assert!(!keyboard.handle_key(KeyCode::Unknown, true));
        assert!(keyboard.held().is_empty());
    }

    #[test]
    fn test_reset_releases_all() {
        let mut keyboard = KeyboardState::new();
        keyboard.handle_key(KeyCode::Space, true);
        keyboard.handle_key(KeyCode::ArrowUp, true);
        keyboard.reset();
        assert!(!keyboard.is_held(KeyCode::Space));
        assert!(!keyboard.is_held(KeyCode::ArrowUp));
    }
}

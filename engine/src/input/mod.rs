//! Input Module
//!
//! Platform-agnostic input handling. The binary translates window events into
//! [`KeyCode`]s; [`InputState`] turns them into logical [`InputAction`]s for
//! one tick: discrete presses plus continuously held actions.
//!
//! # Example
//!
//! ```rust,ignore
//! use space_bear_engine::input::{InputState, KeyBindings, KeyCode, InputAction};
//!
//! let bindings = KeyBindings::new();
//! let mut input = InputState::new();
//!
//! input.handle_key(&bindings, KeyCode::ArrowLeft, true);
//! assert!(input.was_pressed(InputAction::MoveLeft));
//! input.end_frame();
//! assert!(input.is_held(InputAction::MoveLeft));
//! ```

pub mod bindings;
pub mod keyboard;

pub use bindings::{InputAction, KeyBindings};
pub use keyboard::{KeyCode, KeyboardState};

use std::collections::HashSet;

/// Per-tick action state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keyboard: KeyboardState,
    /// Fresh key-down actions since the last `end_frame`, in arrival order.
    pressed: Vec<InputAction>,
    held: HashSet<InputAction>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event through `bindings`.
    pub fn handle_key(&mut self, bindings: &KeyBindings, key: KeyCode, pressed: bool) {
        let fresh = self.keyboard.handle_key(key, pressed);
        let Some(action) = bindings.get_action(key) else {
            return;
        };
        if fresh {
            self.press(action);
        } else if !pressed {
            self.release(action);
        }
    }

    /// Record a key-down for `action` and mark it held.
    pub fn press(&mut self, action: InputAction) {
        self.pressed.push(action);
        self.held.insert(action);
    }

    pub fn release(&mut self, action: InputAction) {
        self.held.remove(&action);
    }

    pub fn pressed(&self) -> &[InputAction] {
        &self.pressed
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(&action)
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Drop this tick's presses; held state carries over.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Reset all input state to defaults.
    pub fn reset(&mut self) {
        self.keyboard.reset();
        self.pressed.clear();
        self.held.clear();
    }
}

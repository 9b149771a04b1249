//! Input Bindings Module
//!
//! Maps physical keys to logical game actions, so game code reads actions and
//! keys can be remapped without touching it.

use std::collections::{HashMap, HashSet};

use super::KeyCode;

/// Logical input actions.
///
/// Placement mode reads these as discrete presses; flight mode reads the
/// steering actions as held state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Shift the falling block left / turn left in flight (default: Left)
    MoveLeft,
    /// Shift the falling block right / turn right in flight (default: Right)
    MoveRight,
    /// Rotate the falling block 90 degrees / pitch up in flight (default: Up)
    Rotate,
    /// Drop the falling block one row / pitch down in flight (default: Down)
    Drop,
    /// Advance the build front; leaves placement when past the stack (default: Enter)
    Confirm,
    /// Thrust forward in flight (default: Space)
    Thrust,
    /// Quit the game (default: Escape)
    Quit,
}

/// Maps physical keys to logical actions, one key per action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Map from physical key to logical action
    key_to_action: HashMap<KeyCode, InputAction>,
    /// Map from logical action to physical key (for reverse lookup and display)
    action_to_key: HashMap<InputAction, KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Create bindings with the default arrow-key layout.
    pub fn new() -> Self {
        let mut bindings = Self {
            key_to_action: HashMap::new(),
            action_to_key: HashMap::new(),
        };

        bindings.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::MoveRight);
        bindings.bind(KeyCode::ArrowUp, InputAction::Rotate);
        bindings.bind(KeyCode::ArrowDown, InputAction::Drop);
        bindings.bind(KeyCode::Enter, InputAction::Confirm);
        bindings.bind(KeyCode::Space, InputAction::Thrust);
        bindings.bind(KeyCode::Escape, InputAction::Quit);

        bindings
    }

    /// Bind a physical key to a logical action.
    ///
    /// Any previous binding of either the key or the action is removed.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        if let Some(old_action) = self.key_to_action.remove(&key) {
            self.action_to_key.remove(&old_action);
        }
        if let Some(old_key) = self.action_to_key.remove(&action) {
            self.key_to_action.remove(&old_key);
        }

        self.key_to_action.insert(key, action);
        self.action_to_key.insert(action, key);
    }

    /// Remove the binding for a specific key.
    pub fn unbind_key(&mut self, key: KeyCode) {
        if let Some(action) = self.key_to_action.remove(&key) {
            self.action_to_key.remove(&action);
        }
    }

    /// Get the action bound to a physical key, if any.
    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Get the key bound to a logical action, if any.
    pub fn get_key(&self, action: InputAction) -> Option<KeyCode> {
        self.action_to_key.get(&action).copied()
    }

    /// Check if an action's key is in the set of held keys.
    pub fn is_action_held(&self, action: InputAction, held_keys: &HashSet<KeyCode>) -> bool {
        self.action_to_key
            .get(&action)
            .is_some_and(|key| held_keys.contains(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get_action(KeyCode::ArrowLeft), Some(InputAction::MoveLeft));
        assert_eq!(bindings.get_action(KeyCode::ArrowRight), Some(InputAction::MoveRight));
        assert_eq!(bindings.get_action(KeyCode::ArrowUp), Some(InputAction::Rotate));
        assert_eq!(bindings.get_action(KeyCode::ArrowDown), Some(InputAction::Drop));
        assert_eq!(bindings.get_action(KeyCode::Enter), Some(InputAction::Confirm));
        assert_eq!(bindings.get_action(KeyCode::Space), Some(InputAction::Thrust));
        assert_eq!(bindings.get_action(KeyCode::Escape), Some(InputAction::Quit));
    }

    #[test]
    fn test_rebind_key() {
        let mut bindings = KeyBindings::new();

        bindings.bind(KeyCode::NumpadEnter, InputAction::Confirm);

        assert_eq!(bindings.get_action(KeyCode::Enter), None);
        assert_eq!(bindings.get_action(KeyCode::NumpadEnter), Some(InputAction::Confirm));
        assert_eq!(bindings.get_key(InputAction::Confirm), Some(KeyCode::NumpadEnter));
    }

    #[test]
    fn test_is_action_held() {
        let bindings = KeyBindings::new();

        let mut held = HashSet::new();
        held.insert(KeyCode::Space);

        assert!(bindings.is_action_held(InputAction::Thrust, &held));
        assert!(!bindings.is_action_held(InputAction::MoveLeft, &held));
    }

    #[test]
    fn test_unbind_key() {
        let mut bindings = KeyBindings::new();

        bindings.unbind_key(KeyCode::Space);

        assert_eq!(bindings.get_action(KeyCode::Space), None);
        assert_eq!(bindings.get_key(InputAction::Thrust), None);
    }
}

//! Per-frame pointer and hotkey state.
//!
//! Captures the global cursor position and the diagnostic hotkeys from the
//! input collaborator and exposes them to systems via the [`InputState`]
//! resource. Defaults bind F1 to the registry dump, F2 to the event bus dump
//! and F6 to the menu dump.
use bevy_ecs::prelude::*;
use glam::Vec2;

/// Keys the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Null,
    F1,
    F2,
    F6,
}

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key was just pressed this frame.
    pub just_pressed: bool,

    /// The key bound to this action.
    pub key_binding: Key,
}

impl Default for BoolState {
    fn default() -> Self {
        Self {
            just_pressed: false,
            key_binding: Key::Null,
        }
    }
}

impl BoolState {
    fn bound(key: Key) -> Self {
        Self {
            just_pressed: false,
            key_binding: key,
        }
    }
}

/// Resource capturing the per-frame pointer position and hotkeys.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    /// Cursor position in screen pixels.
    pub cursor: Vec2,
    pub dump_registry: BoolState,
    pub dump_events: BoolState,
    pub dump_menus: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            cursor: Vec2::ZERO,
            dump_registry: BoolState::bound(Key::F1),
            dump_events: BoolState::bound(Key::F2),
            dump_menus: BoolState::bound(Key::F6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolstate_default() {
        let bs = BoolState::default();
        assert!(!bs.just_pressed);
        assert_eq!(bs.key_binding, Key::Null);
    }

    #[test]
    fn test_inputstate_default_key_bindings() {
        let input = InputState::default();
        assert_eq!(input.cursor, Vec2::ZERO);
        assert_eq!(input.dump_registry.key_binding, Key::F1);
        assert_eq!(input.dump_events.key_binding, Key::F2);
        assert_eq!(input.dump_menus.key_binding, Key::F6);
        assert!(!input.dump_registry.just_pressed);
        assert!(!input.dump_events.just_pressed);
        assert!(!input.dump_menus.just_pressed);
    }
}

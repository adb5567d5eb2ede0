use bevy_ecs::prelude::Component;

/// Per-frame pointer flags reported by the input collaborator.
///
/// Refreshed by [`poll_input`](crate::systems::input::poll_input) for every
/// registered entity; entities that have not been flushed yet keep the
/// all-false default.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseState {
    /// The cursor entered the entity this frame.
    pub enter: bool,
    /// The cursor left the entity this frame.
    pub leave: bool,
    /// The button was pressed over the entity this frame.
    pub clicked: bool,
    /// The button was released over the entity this frame.
    pub released: bool,
}

impl MouseState {
    /// A state with only `clicked` set.
    pub fn clicked() -> Self {
        Self {
            clicked: true,
            ..Self::default()
        }
    }

    /// A state with only `released` set.
    pub fn released() -> Self {
        Self {
            released: true,
            ..Self::default()
        }
    }
}

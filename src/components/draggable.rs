//! Drag state of a managed entity.
//!
//! The drag controller polls these flags once per frame; see
//! [`drag_update`](crate::systems::drag::drag_update).

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Draggable {
    /// Cursor position minus entity position, captured when the drag began.
    pub offset: Vec2,
    /// The entity is currently being dragged.
    pub dragging: bool,
    /// The entity may start a drag at all.
    pub enabled: bool,
}

impl Draggable {
    /// An idle drag state that is eligible for dragging.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Enter the dragging state, remembering where the cursor grabbed the entity.
    pub fn start(&mut self, cursor: Vec2, position: Vec2) {
        self.offset = cursor - position;
        self.dragging = true;
    }

    /// Leave the dragging state.
    pub fn stop(&mut self) {
        self.dragging = false;
        self.offset = Vec2::ZERO;
    }

    /// Where the entity goes while it follows `cursor`.
    pub fn follow(&self, cursor: Vec2) -> Vec2 {
        cursor - self.offset
    }
}

//! Input systems.
//!
//! - [`poll_input`] reads the input collaborator once per frame: the global
//!   cursor and diagnostic hotkeys go into
//!   [`InputState`](crate::resources::input::InputState), the per-entity
//!   pointer flags into each registered entity's [`MouseState`].
use bevy_ecs::prelude::*;

use crate::components::mouse::MouseState;
use crate::components::render::Render;
use crate::components::space::Space;
use crate::resources::backend::InputBridge;
use crate::resources::input::InputState;
use crate::resources::registry::EntityRegistry;

/// Poll the input collaborator and refresh pointer state.
///
/// Only entities already registered with the collaborators are polled; the
/// others keep zeroed flags until they are flushed.
pub fn poll_input(
    mut input: ResMut<InputState>,
    mut bridge: ResMut<InputBridge>,
    registry: Res<EntityRegistry>,
    mut query: Query<(&Space, &Render, &mut MouseState)>,
) {
    input.cursor = bridge.0.cursor();

    let is_key_pressed = |key| bridge.0.is_key_pressed(key);
    input.dump_registry.just_pressed = is_key_pressed(input.dump_registry.key_binding);
    input.dump_events.just_pressed = is_key_pressed(input.dump_events.key_binding);
    input.dump_menus.just_pressed = is_key_pressed(input.dump_menus.key_binding);

    for entity in registry.sent() {
        let Ok((space, render, mut mouse)) = query.get_mut(entity) else {
            continue;
        };
        let state = bridge.0.mouse_state(entity, space, render.hidden);
        if *mouse != state {
            *mouse = state;
        }
    }

    bridge.0.end_frame();
}

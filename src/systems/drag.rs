//! Drag controller.
//!
//! Polls every managed, drag-eligible entity once per frame:
//!
//! - idle and clicked: start dragging, unless one of its children was
//!   clicked in the same frame; children capture their own offsets
//! - dragging and released: stop dragging, children included
//! - dragging: follow the cursor, keeping the captured offset
//!
//! Starting or stopping a drag is announced on the event bus
//! ([`EVENT_START_DRAG`], [`EVENT_STOP_DRAG`]) and ends the frame's scan.
//! The whole update is skipped while either event is disabled.

use bevy_ecs::error::BevyError;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info};

use crate::components::draggable::Draggable;
use crate::components::mouse::MouseState;
use crate::components::space::Space;
use crate::error::CoreError;
use crate::events::drag::{EVENT_START_DRAG, EVENT_STOP_DRAG};
use crate::events::payload::EventPayload;
use crate::resources::eventbus::EventBus;
use crate::resources::input::InputState;
use crate::resources::registry::EntityRegistry;
use crate::systems::eventbus;
use crate::systems::registry::children_of;

/// Register the drag events.
pub fn setup(world: &mut World) -> Result<(), CoreError> {
    eventbus::register_event(world, EVENT_START_DRAG)?;
    eventbus::register_event(world, EVENT_STOP_DRAG)?;
    Ok(())
}

pub fn enable(world: &mut World) -> Result<(), CoreError> {
    eventbus::enable(world, EVENT_START_DRAG)?;
    eventbus::enable(world, EVENT_STOP_DRAG)?;
    info!("DS:Enable - drag controller enabled");
    Ok(())
}

pub fn disable(world: &mut World) -> Result<(), CoreError> {
    eventbus::disable(world, EVENT_START_DRAG)?;
    eventbus::disable(world, EVENT_STOP_DRAG)?;
    info!("DS:Disable - drag controller disabled");
    Ok(())
}

fn is_running(world: &World) -> bool {
    world.get_resource::<EventBus>().is_some_and(|bus| {
        bus.is_active(EVENT_START_DRAG).unwrap_or(false)
            && bus.is_active(EVENT_STOP_DRAG).unwrap_or(false)
    })
}

fn start_drag(world: &mut World, entity: Entity, cursor: Vec2) {
    let Some(position) = world.get::<Space>(entity).map(|s| s.position) else {
        return;
    };
    if let Some(mut draggable) = world.get_mut::<Draggable>(entity) {
        draggable.start(cursor, position);
    }
}

fn stop_drag(world: &mut World, entity: Entity) {
    if let Some(mut draggable) = world.get_mut::<Draggable>(entity) {
        draggable.stop();
    }
}

fn clicked(world: &World, entity: Entity) -> bool {
    world
        .get::<MouseState>(entity)
        .is_some_and(|mouse| mouse.clicked)
}

/// Per-frame drag step. At most one transition is processed per frame.
pub fn drag_update(world: &mut World) -> Result<(), BevyError> {
    if !is_running(world) {
        return Ok(());
    }
    let cursor = world
        .get_resource::<InputState>()
        .map(|input| input.cursor)
        .unwrap_or_default();
    let live = world
        .get_resource::<EntityRegistry>()
        .map(EntityRegistry::live)
        .unwrap_or_default();

    for entity in live {
        let (Some(draggable), Some(mouse)) = (
            world.get::<Draggable>(entity).copied(),
            world.get::<MouseState>(entity).copied(),
        ) else {
            continue;
        };
        if !draggable.enabled {
            continue;
        }

        if mouse.clicked {
            let children = children_of(world, entity);
            if let Some(child) = children.iter().copied().find(|c| clicked(world, *c)) {
                debug!("DS:Update - cancel drag of {} because {} was clicked", entity, child);
                return Ok(());
            }
            for child in children {
                start_drag(world, child, cursor);
            }
            start_drag(world, entity, cursor);
            eventbus::dispatch(world, EVENT_START_DRAG, EventPayload::Entity(entity))?;
            return Ok(());
        }

        if mouse.released && draggable.dragging {
            for child in children_of(world, entity) {
                stop_drag(world, child);
            }
            stop_drag(world, entity);
            eventbus::dispatch(world, EVENT_STOP_DRAG, EventPayload::Entity(entity))?;
            return Ok(());
        }

        if draggable.dragging {
            if let Some(mut space) = world.get_mut::<Space>(entity) {
                space.position = draggable.follow(cursor);
            }
        }
    }
    Ok(())
}

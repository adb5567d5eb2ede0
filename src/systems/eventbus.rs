//! Event bus operations.
//!
//! Events are registered once by name, then listened to and dispatched
//! through the [`EventBus`] resource. Each event owns an identity entity used
//! by [`remove`]. Subscribers are one-shot systems taking the payload as
//! [`In<EventPayload>`]; [`dispatch`] runs them in subscription order and
//! returns once all of them completed.
//!
//! Every operation on an unknown name fails with [`CoreError::UnknownEvent`].

use bevy_ecs::error::BevyError;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::error::CoreError;
use crate::events::payload::EventPayload;
use crate::resources::eventbus::{Event, EventBus, EventBusSnapshot, Subscriber};
use crate::resources::input::InputState;

fn unknown(name: &str) -> CoreError {
    CoreError::UnknownEvent(name.to_string())
}

/// Create the event `name`, active and with an empty payload.
pub fn register_event(world: &mut World, name: &str) -> Result<Entity, CoreError> {
    if world.get_resource_or_init::<EventBus>().contains(name) {
        return Err(CoreError::DuplicateEvent(name.to_string()));
    }
    let id = world.spawn_empty().id();
    world.resource_mut::<EventBus>().register(name, id)?;
    info!("ES:NewEvent: created {} {}", id, name);
    Ok(id)
}

/// Copy of the event record for `name`.
pub fn get_event(world: &World, name: &str) -> Result<Event, CoreError> {
    world
        .get_resource::<EventBus>()
        .ok_or_else(|| unknown(name))?
        .get(name)
        .cloned()
}

/// Subscribe `handler` to `name` and mark the event listened.
pub fn listen<M>(
    world: &mut World,
    name: &str,
    handler: impl IntoSystem<In<EventPayload>, (), M> + 'static,
) -> Result<Subscriber, CoreError> {
    if !world.get_resource_or_init::<EventBus>().contains(name) {
        return Err(unknown(name));
    }
    let subscriber = world.register_system(handler);
    world
        .resource_mut::<EventBus>()
        .subscribe(name, subscriber)?;
    info!("ES:Listen: listening event {} with {:?}", name, subscriber);
    Ok(subscriber)
}

/// Replace the payload of `name`, deliver it to every subscriber and count
/// the dispatch.
///
/// A disabled event still records the payload and the count but delivers
/// nothing.
pub fn dispatch(world: &mut World, name: &str, payload: EventPayload) -> Result<(), CoreError> {
    let subscribers = world
        .get_resource_or_init::<EventBus>()
        .prepare_dispatch(name, payload.clone())?;

    for subscriber in subscribers {
        world
            .run_system_with(subscriber, payload.clone())
            .map_err(|e| CoreError::Handler {
                event: name.to_string(),
                reason: e.to_string(),
            })?;
    }

    world.resource_mut::<EventBus>().finish_dispatch(name);
    debug!("ES:Dispatch: {} dispatched", name);
    Ok(())
}

/// Stop delivering `name` to its subscribers.
pub fn disable(world: &mut World, name: &str) -> Result<(), CoreError> {
    world
        .get_resource_or_init::<EventBus>()
        .set_active(name, false)?;
    debug!("ES:Disable: {} disabled", name);
    Ok(())
}

/// Resume delivering `name` to its subscribers.
pub fn enable(world: &mut World, name: &str) -> Result<(), CoreError> {
    world
        .get_resource_or_init::<EventBus>()
        .set_active(name, true)?;
    debug!("ES:Enable: {} enabled", name);
    Ok(())
}

pub fn is_active(world: &World, name: &str) -> Result<bool, CoreError> {
    world
        .get_resource::<EventBus>()
        .ok_or_else(|| unknown(name))?
        .is_active(name)
}

/// Delete the event whose identity is `id`, unregistering its subscribers.
pub fn remove(world: &mut World, id: Entity) -> Result<(), CoreError> {
    let event = world
        .get_resource_or_init::<EventBus>()
        .remove_by_id(id)?;

    for subscriber in event.subscribers {
        if let Err(e) = world.unregister_system(subscriber) {
            warn!("ES:Remove: subscriber of {} already gone: {}", event.name, e);
        }
    }
    world.despawn(id);
    info!("ES:Remove: {} {} removed", id, event.name);
    Ok(())
}

pub fn debug(world: &World) -> EventBusSnapshot {
    world
        .get_resource::<EventBus>()
        .map(EventBus::snapshot)
        .unwrap_or(EventBusSnapshot { events: Vec::new() })
}

/// Per-frame event bus step. Logs the JSON dump when the event hotkey was
/// pressed.
pub fn event_bus_update(world: &mut World) -> Result<(), BevyError> {
    let dump = world
        .get_resource::<InputState>()
        .is_some_and(|input| input.dump_events.just_pressed);
    if dump {
        info!("ES:Debug - {}", serde_json::to_string_pretty(&debug(world))?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Seen(Vec<EventPayload>);

    fn record(In(payload): In<EventPayload>, mut seen: ResMut<Seen>) {
        seen.0.push(payload);
    }

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<Seen>();
        world
    }

    #[test]
    fn test_dispatch_delivers_and_counts() {
        let mut w = world();
        register_event(&mut w, "X").unwrap();
        listen(&mut w, "X", record).unwrap();

        dispatch(&mut w, "X", EventPayload::Menu { menu: "m".into() }).unwrap();

        assert_eq!(w.resource::<Seen>().0.len(), 1);
        let event = get_event(&w, "X").unwrap();
        assert!(event.listened);
        assert_eq!(event.dispatched, 1);
    }

    #[test]
    fn test_unknown_name_is_fatal() {
        let mut w = world();
        assert_eq!(
            dispatch(&mut w, "nope", EventPayload::Empty),
            Err(CoreError::UnknownEvent("nope".into()))
        );
        assert!(listen(&mut w, "nope", record).is_err());
        assert!(enable(&mut w, "nope").is_err());
        assert!(get_event(&w, "nope").is_err());
    }

    #[test]
    fn test_disabled_event_delivers_nothing() {
        let mut w = world();
        register_event(&mut w, "X").unwrap();
        listen(&mut w, "X", record).unwrap();

        disable(&mut w, "X").unwrap();
        assert_eq!(is_active(&w, "X"), Ok(false));
        dispatch(&mut w, "X", EventPayload::Empty).unwrap();
        assert!(w.resource::<Seen>().0.is_empty());

        enable(&mut w, "X").unwrap();
        dispatch(&mut w, "X", EventPayload::Empty).unwrap();
        assert_eq!(w.resource::<Seen>().0.len(), 1);
        assert_eq!(get_event(&w, "X").unwrap().dispatched, 2);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut w = world();
        let id = register_event(&mut w, "X").unwrap();
        listen(&mut w, "X", record).unwrap();

        remove(&mut w, id).unwrap();
        assert!(get_event(&w, "X").is_err());
        assert_eq!(remove(&mut w, id), Err(CoreError::EventNotFound(id)));
    }
}

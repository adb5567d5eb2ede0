//! Named publish/subscribe event records.
//!
//! The [`EventBus`] resource maps event names to [`Event`] records. Each
//! record keeps the last dispatched payload, an active flag gating delivery,
//! a dispatch counter and the subscribers attached with
//! [`eventbus::listen`](crate::systems::eventbus::listen).
//!
//! Subscribers are bevy systems registered on the world and taking the
//! payload as [`In<EventPayload>`]; dispatch runs them synchronously, in
//! subscription order. The world-facing operations live in
//! [`crate::systems::eventbus`].
//!
//! Every operation on a name that was never registered is a usage error
//! ([`CoreError::UnknownEvent`]).

use bevy_ecs::prelude::{Entity, In, Resource};
use bevy_ecs::system::SystemId;
use log::debug;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::events::payload::EventPayload;

/// Handle of a subscriber system.
pub type Subscriber = SystemId<In<EventPayload>>;

/// A named, counted publish/subscribe channel.
#[derive(Debug, Clone)]
pub struct Event {
    /// Identity of the record, used by [`remove`](crate::systems::eventbus::remove).
    pub id: Entity,
    pub name: String,
    /// Payload of the last dispatch.
    pub payload: EventPayload,
    /// Delivery happens only while active.
    pub active: bool,
    /// True once at least one subscriber was attached.
    pub listened: bool,
    pub dispatched: u32,
    pub subscribers: Vec<Subscriber>,
}

impl Event {
    fn new(id: Entity, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            payload: EventPayload::Empty,
            active: true,
            listened: false,
            dispatched: 0,
            subscribers: Vec::new(),
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct EventBus {
    events: FxHashMap<String, Event>,
}

impl EventBus {
    /// Create the record for `name`, active and with an empty payload.
    pub fn register(&mut self, name: &str, id: Entity) -> Result<(), CoreError> {
        if self.events.contains_key(name) {
            return Err(CoreError::DuplicateEvent(name.to_string()));
        }
        self.events.insert(name.to_string(), Event::new(id, name));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&Event, CoreError> {
        self.events
            .get(name)
            .ok_or_else(|| CoreError::UnknownEvent(name.to_string()))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Event, CoreError> {
        self.events
            .get_mut(name)
            .ok_or_else(|| CoreError::UnknownEvent(name.to_string()))
    }

    /// Attach a subscriber and mark the event as listened.
    pub fn subscribe(&mut self, name: &str, subscriber: Subscriber) -> Result<(), CoreError> {
        let event = self.get_mut(name)?;
        event.subscribers.push(subscriber);
        event.listened = true;
        Ok(())
    }

    /// Replace the payload of `name` and return the subscribers to deliver
    /// it to. Inactive events return no subscribers.
    pub fn prepare_dispatch(
        &mut self,
        name: &str,
        payload: EventPayload,
    ) -> Result<Vec<Subscriber>, CoreError> {
        let event = self.get_mut(name)?;
        event.payload = payload;
        if !event.active {
            debug!("ES:Dispatch: {} is disabled, nothing delivered", name);
            return Ok(Vec::new());
        }
        Ok(event.subscribers.clone())
    }

    /// Count one completed dispatch. A record removed by one of its own
    /// handlers is silently ignored.
    pub fn finish_dispatch(&mut self, name: &str) {
        if let Some(event) = self.events.get_mut(name) {
            event.dispatched += 1;
        }
    }

    pub fn set_active(&mut self, name: &str, active: bool) -> Result<(), CoreError> {
        self.get_mut(name)?.active = active;
        Ok(())
    }

    pub fn is_active(&self, name: &str) -> Result<bool, CoreError> {
        Ok(self.get(name)?.active)
    }

    /// Delete the record whose identity is `id`.
    pub fn remove_by_id(&mut self, id: Entity) -> Result<Event, CoreError> {
        let name = self
            .events
            .values()
            .find(|event| event.id == id)
            .map(|event| event.name.clone())
            .ok_or(CoreError::EventNotFound(id))?;
        self.events
            .remove(&name)
            .ok_or(CoreError::EventNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn snapshot(&self) -> EventBusSnapshot {
        let events = self
            .names()
            .into_iter()
            .filter_map(|name| self.events.get(&name))
            .map(|event| EventSnapshot {
                name: event.name.clone(),
                id: event.id.to_string(),
                active: event.active,
                listened: event.listened,
                dispatched: event.dispatched,
                subscribers: event.subscribers.len(),
                payload: event.payload.describe(),
            })
            .collect();
        EventBusSnapshot { events }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSnapshot {
    pub name: String,
    pub id: String,
    pub active: bool,
    pub listened: bool,
    pub dispatched: u32,
    pub subscribers: usize,
    pub payload: String,
}

/// Textual dump of the bus, produced by
/// [`eventbus::debug`](crate::systems::eventbus::debug).
#[derive(Debug, Clone, Serialize)]
pub struct EventBusSnapshot {
    pub events: Vec<EventSnapshot>,
}

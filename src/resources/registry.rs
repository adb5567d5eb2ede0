//! Entity registry bookkeeping.
//!
//! [`EntityRegistry`] is the sole owner of managed-entity lifetime. It keeps
//! three pieces of state:
//!
//! - the live instance set: every entity created or added and not yet removed
//! - the pending buffer: entities added since the last flush
//! - the "already sent" set: entities registered with the render and input
//!   collaborators, so no entity is ever registered twice
//!
//! The two-phase add/flush lets systems create entities while a frame is
//! still iterating the live set; collaborators only see them at the next
//! [`flush`](crate::systems::registry::flush). The operations that need the
//! world live in [`crate::systems::registry`]; this type only holds state.

use std::collections::BTreeMap;

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// An entity waiting for the next flush.
///
/// The parent and label are captured when the entity is added so that a
/// flush can still report them after the entity was removed and despawned.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub entity: Entity,
    pub parent: Option<Entity>,
    pub reference: String,
}

#[derive(Resource, Debug, Default)]
pub struct EntityRegistry {
    // Keyed by insertion sequence so scans follow creation order.
    instances: BTreeMap<u64, Entity>,
    index: FxHashMap<Entity, u64>,
    next_seq: u64,
    sent: FxHashSet<Entity>,
    buffer: Vec<Pending>,
}

impl EntityRegistry {
    /// Insert `entity` into the live set. Returns false if it was already live.
    pub fn track(&mut self, entity: Entity) -> bool {
        if self.index.contains_key(&entity) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(entity, seq);
        self.instances.insert(seq, entity);
        true
    }

    /// Drop `entity` from the live set. Returns false if it was not live.
    pub fn untrack(&mut self, entity: Entity) -> bool {
        match self.index.remove(&entity) {
            Some(seq) => {
                self.instances.remove(&seq);
                true
            }
            None => false,
        }
    }

    pub fn is_tracked(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Snapshot of the live set in insertion order, safe to hold while
    /// mutating the world.
    pub fn live(&self) -> Vec<Entity> {
        self.instances.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Append an entity to the pending buffer.
    pub fn enqueue(&mut self, pending: Pending) {
        self.buffer.push(pending);
    }

    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn pending(&self) -> &[Pending] {
        &self.buffer
    }

    /// Empty the pending buffer, handing its content to the caller.
    pub fn take_pending(&mut self) -> Vec<Pending> {
        std::mem::take(&mut self.buffer)
    }

    /// Record that `entity` reached the collaborators. Returns false if it
    /// had already been sent.
    pub fn mark_sent(&mut self, entity: Entity) -> bool {
        self.sent.insert(entity)
    }

    pub fn is_sent(&self, entity: Entity) -> bool {
        self.sent.contains(&entity)
    }

    pub fn forget_sent(&mut self, entity: Entity) {
        self.sent.remove(&entity);
    }

    /// Registered entities in insertion order. Entities sent without being
    /// tracked come last.
    pub fn sent(&self) -> Vec<Entity> {
        let mut sent: Vec<(u64, Entity)> = self
            .sent
            .iter()
            .map(|e| (self.index.get(e).copied().unwrap_or(u64::MAX), *e))
            .collect();
        sent.sort_by_key(|(seq, _)| *seq);
        sent.into_iter().map(|(_, e)| e).collect()
    }
}

/// One live entity in a [`RegistrySnapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct InstanceSnapshot {
    pub id: String,
    pub reference: String,
    pub hidden: bool,
}

/// Textual dump of the registry, produced by
/// [`registry::debug`](crate::systems::registry::debug).
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub instances: Vec<InstanceSnapshot>,
    pub sent: Vec<String>,
    pub buffer: Vec<String>,
    /// One entry per entity with children: `parent -> child -> ...`.
    pub chains: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    #[test]
    fn test_track_untrack() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut registry = EntityRegistry::default();

        assert!(registry.track(e));
        assert!(!registry.track(e));
        assert!(registry.is_tracked(e));
        assert_eq!(registry.len(), 1);
        assert!(registry.untrack(e));
        assert!(!registry.untrack(e));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_take_pending_clears_buffer() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut registry = EntityRegistry::default();

        registry.enqueue(Pending {
            entity: e,
            parent: None,
            reference: "a".into(),
        });
        assert!(registry.has_pending());
        let taken = registry.take_pending();
        assert_eq!(taken.len(), 1);
        assert!(!registry.has_pending());
    }

    #[test]
    fn test_mark_sent_once() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut registry = EntityRegistry::default();

        assert!(registry.mark_sent(e));
        assert!(!registry.mark_sent(e));
        assert!(registry.is_sent(e));
        registry.forget_sent(e);
        assert!(!registry.is_sent(e));
    }

    #[test]
    fn test_live_follows_insertion_order() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let c = world.spawn_empty().id();
        let mut registry = EntityRegistry::default();
        registry.track(c);
        registry.track(a);
        registry.track(b);
        assert_eq!(registry.live(), vec![c, a, b]);

        // tracking again keeps the original slot
        registry.track(c);
        assert_eq!(registry.live(), vec![c, a, b]);

        // re-tracking after untrack moves it to the end
        registry.untrack(a);
        registry.track(a);
        assert_eq!(registry.live(), vec![c, b, a]);
    }

    #[test]
    fn test_sent_follows_insertion_order() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let loose = world.spawn_empty().id();
        let mut registry = EntityRegistry::default();
        registry.track(b);
        registry.track(a);
        registry.mark_sent(loose);
        registry.mark_sent(a);
        registry.mark_sent(b);
        assert_eq!(registry.sent(), vec![b, a, loose]);
    }
}

//! Entity registry operations.
//!
//! World-facing half of [`EntityRegistry`]: creating, adding, flushing,
//! removing and copying managed entities, plus the per-frame
//! [`registry_update`] and [`sync_render`] systems.
//!
//! Unknown entities are a data-consistency condition, not a usage error:
//! operations log a warning and return `false`/`None`/`0`. A managed entity
//! reaching the collaborators without [`Space`], [`Render`] or [`MouseState`]
//! is a construction bug and fails with [`CoreError::MissingComponent`].

use bevy_ecs::error::BevyError;
use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use log::{debug, info, warn};
use rustc_hash::FxHashSet;

use crate::components::chain::Chain;
use crate::components::draggable::Draggable;
use crate::components::mouse::MouseState;
use crate::components::reference::Reference;
use crate::components::refresh::AutoRefresh;
use crate::components::render::Render;
use crate::components::space::Space;
use crate::components::zindex::ZIndex;
use crate::error::CoreError;
use crate::resources::backend::{InputBridge, RenderBridge};
use crate::resources::input::InputState;
use crate::resources::registry::{EntityRegistry, InstanceSnapshot, Pending, RegistrySnapshot};

/// Spawn a managed entity with zero-valued state.
///
/// The entity is live immediately but invisible to the collaborators until
/// it is [`add`]ed and [`flush`]ed.
pub fn create_entity(world: &mut World) -> Entity {
    let entity = world
        .spawn((
            Space::default(),
            Render::default(),
            MouseState::default(),
            Draggable::default(),
            Chain::default(),
            ZIndex::BASE,
            Reference::default(),
        ))
        .id();
    world
        .get_resource_or_init::<EntityRegistry>()
        .track(entity);
    entity
}

/// Ordered tree children of `entity`.
pub fn children_of(world: &World, entity: Entity) -> Vec<Entity> {
    world
        .get::<Children>(entity)
        .map(|children| children.to_vec())
        .unwrap_or_default()
}

/// Tree parent of `entity`, if any.
pub fn parent_of(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<ChildOf>(entity).map(|child_of| child_of.parent())
}

/// Append `child` to the ordered children of `parent`.
pub fn append_child(world: &mut World, parent: Entity, child: Entity) {
    if let Ok(mut child_mut) = world.get_entity_mut(child) {
        child_mut.insert(ChildOf(parent));
    } else {
        warn!("EM:AppendChild - unknown child {}", child);
    }
}

fn reference_of(world: &World, entity: Entity) -> String {
    world
        .get::<Reference>(entity)
        .map(|r| r.0.clone())
        .unwrap_or_default()
}

fn set_chain(world: &mut World, entity: Entity, update: impl FnOnce(&mut Chain)) {
    let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
        return;
    };
    if !entity_mut.contains::<Chain>() {
        entity_mut.insert(Chain::default());
    }
    if let Some(mut chain) = entity_mut.get_mut::<Chain>() {
        update(&mut chain);
    }
}

/// Buffer `entities` for the next flush and make them live.
///
/// An entity with tree children also gets its processing chain built:
/// parent, then each child in order.
pub fn add(world: &mut World, entities: &[Entity]) {
    for &entity in entities {
        if world.get_entity(entity).is_err() {
            warn!("EM:Add - skip entity {}, despawned", entity);
            continue;
        }

        let pending = Pending {
            entity,
            parent: parent_of(world, entity),
            reference: reference_of(world, entity),
        };
        {
            let mut registry = world.get_resource_or_init::<EntityRegistry>();
            registry.track(entity);
            registry.enqueue(pending);
        }

        let mut prev = entity;
        for child in children_of(world, entity) {
            set_chain(world, prev, |chain| chain.next = Some(child));
            set_chain(world, child, |chain| chain.prev = Some(prev));
            prev = child;
        }
    }
}

fn register(world: &mut World, entity: Entity) -> Result<bool, CoreError> {
    if world.get_resource_or_init::<EntityRegistry>().is_sent(entity) {
        return Ok(false);
    }

    let entity_ref = world
        .get_entity(entity)
        .map_err(|_| CoreError::MissingComponent {
            entity,
            component: "Space",
        })?;
    let space = *entity_ref
        .get::<Space>()
        .ok_or(CoreError::MissingComponent {
            entity,
            component: "Space",
        })?;
    let render = entity_ref
        .get::<Render>()
        .cloned()
        .ok_or(CoreError::MissingComponent {
            entity,
            component: "Render",
        })?;
    if !entity_ref.contains::<MouseState>() {
        return Err(CoreError::MissingComponent {
            entity,
            component: "MouseState",
        });
    }

    if let Some(mut bridge) = world.get_resource_mut::<InputBridge>() {
        bridge.0.register(entity);
    }
    if let Some(mut bridge) = world.get_resource_mut::<RenderBridge>() {
        bridge.0.register(entity, &render, &space);
    }
    Ok(world
        .get_resource_or_init::<EntityRegistry>()
        .mark_sent(entity))
}

/// Register every buffered entity, and its children, with the collaborators.
///
/// Entities removed since they were added are skipped with a warning. The
/// buffer is emptied even when an error stops the flush. Returns how many
/// entities reached the collaborators.
pub fn flush(world: &mut World) -> Result<usize, CoreError> {
    let pending = world
        .get_resource_or_init::<EntityRegistry>()
        .take_pending();
    let mut flushed = 0;

    for Pending {
        entity,
        parent,
        reference,
    } in pending
    {
        if reference.is_empty() {
            warn!("EM:Flush - entity {} has no reference", entity);
        }

        if !world.resource::<EntityRegistry>().is_tracked(entity) {
            let parent = match parent {
                Some(parent) => reference_of(world, parent),
                None => "none".to_string(),
            };
            warn!(
                "EM:Flush - skip entity {} ({}), removed or not managed, parent: {}",
                entity, reference, parent
            );
            continue;
        }

        if register(world, entity)? {
            flushed += 1;
        }

        for child in children_of(world, entity) {
            if !world.resource::<EntityRegistry>().is_tracked(child) {
                warn!(
                    "EM:Flush - skip child {} of {}, removed or not managed",
                    child, entity
                );
                continue;
            }
            if register(world, child)? {
                flushed += 1;
            }
        }
    }

    if flushed > 0 {
        info!("EM:Flush - {} entities flushed", flushed);
    }
    Ok(flushed)
}

/// Register any tree child of `entity` the render collaborator does not
/// know yet. Returns how many were registered.
pub fn refresh(world: &mut World, entity: Entity) -> Result<usize, CoreError> {
    if !world.get_resource_or_init::<EntityRegistry>().is_tracked(entity) {
        warn!("EM:Refresh - unknown entity {}", entity);
        return Ok(0);
    }

    let mut refreshed = 0;
    for child in children_of(world, entity) {
        let known = world
            .get_resource::<RenderBridge>()
            .is_some_and(|bridge| bridge.0.exists(child));
        if known {
            continue;
        }
        if !world.resource::<EntityRegistry>().is_tracked(child) {
            warn!(
                "EM:Refresh - skip child {} of entity {}, removed or not managed",
                child, entity
            );
            continue;
        }
        if register(world, child)? {
            debug!("EM:Refresh - new child {} of entity {} registered", child, entity);
            refreshed += 1;
        }
    }
    Ok(refreshed)
}

fn unlink(world: &mut World, entity: Entity) {
    let Some(chain) = world.get::<Chain>(entity).copied() else {
        return;
    };
    if let Some(prev) = chain.prev {
        set_chain(world, prev, |c| c.next = chain.next);
    }
    if let Some(next) = chain.next {
        set_chain(world, next, |c| c.prev = chain.prev);
    }
    set_chain(world, entity, |c| *c = Chain::default());
}

fn remove_tree(world: &mut World, entity: Entity) {
    unlink(world, entity);

    for child in children_of(world, entity) {
        remove_tree(world, child);
    }

    if let Some(mut bridge) = world.get_resource_mut::<RenderBridge>() {
        bridge.0.deregister(entity);
    }
    if let Some(mut bridge) = world.get_resource_mut::<InputBridge>() {
        bridge.0.deregister(entity);
    }
    {
        let mut registry = world.get_resource_or_init::<EntityRegistry>();
        registry.forget_sent(entity);
        registry.untrack(entity);
    }
    world.despawn(entity);
}

/// Remove `entity` and, first, every descendant.
///
/// Returns false, with a warning, if the entity is not managed.
pub fn remove(world: &mut World, entity: Entity) -> bool {
    if !world.get_resource_or_init::<EntityRegistry>().is_tracked(entity) {
        warn!("EM:Remove - failed, unknown entity {}", entity);
        return false;
    }
    remove_tree(world, entity);
    true
}

/// Duplicate the top-level state of `entity` under a fresh identity and add
/// the copy. Children are not duplicated.
pub fn copy(world: &mut World, entity: Entity) -> Option<Entity> {
    if !world.get_resource_or_init::<EntityRegistry>().is_tracked(entity) {
        warn!("EM:Copy - unknown entity {}", entity);
        return None;
    }
    let source = world.get_entity(entity).ok()?;
    let space = source.get::<Space>().copied().unwrap_or_default();
    let render = source.get::<Render>().cloned().unwrap_or_default();
    let z_index = source.get::<ZIndex>().copied().unwrap_or_default();
    let draggable = source
        .get::<Draggable>()
        .map(|d| Draggable {
            enabled: d.enabled,
            ..Draggable::default()
        })
        .unwrap_or_default();
    let reference = Reference::new(format!("copy-{}", reference_of(world, entity)));
    let auto_refresh = source.contains::<AutoRefresh>();

    let copy = create_entity(world);
    let mut copy_mut = world.entity_mut(copy);
    copy_mut.insert((space, render, z_index, draggable, reference));
    if auto_refresh {
        copy_mut.insert(AutoRefresh);
    }
    add(world, &[copy]);
    Some(copy)
}

/// First managed entity among `entities`.
pub fn get(world: &World, entities: &[Entity]) -> Option<Entity> {
    let registry = world.get_resource::<EntityRegistry>()?;
    entities.iter().copied().find(|e| registry.is_tracked(*e))
}

/// Set visibility of `entity` and every descendant.
pub fn set_hidden(world: &mut World, entity: Entity, hidden: bool) -> bool {
    match world.get_mut::<Render>(entity) {
        Some(mut render) => render.hidden = hidden,
        None => {
            warn!("EM:SetHidden - unknown entity {}", entity);
            return false;
        }
    }
    for child in children_of(world, entity) {
        set_hidden(world, child, hidden);
    }
    true
}

pub fn is_hidden(world: &World, entity: Entity) -> Option<bool> {
    world.get::<Render>(entity).map(|render| render.hidden)
}

/// Dump of the live set, registered set, buffer and chains.
pub fn debug(world: &World) -> RegistrySnapshot {
    let Some(registry) = world.get_resource::<EntityRegistry>() else {
        return RegistrySnapshot {
            instances: Vec::new(),
            sent: Vec::new(),
            buffer: Vec::new(),
            chains: Vec::new(),
        };
    };

    let live = registry.live();
    let instances = live
        .iter()
        .map(|&entity| InstanceSnapshot {
            id: entity.to_string(),
            reference: reference_of(world, entity),
            hidden: is_hidden(world, entity).unwrap_or(false),
        })
        .collect();

    let buffer = registry
        .pending()
        .iter()
        .map(|p| format!("{} {}", p.entity, p.reference))
        .collect();

    let mut chains = Vec::new();
    for &head in &live {
        let Some(chain) = world.get::<Chain>(head) else {
            continue;
        };
        if chain.prev.is_some() || chain.next.is_none() {
            continue;
        }
        let mut seen = FxHashSet::default();
        let mut line = head.to_string();
        seen.insert(head);
        let mut cursor = chain.next;
        while let Some(next) = cursor {
            if !seen.insert(next) {
                break;
            }
            line.push_str(&format!(" -> {}", next));
            cursor = world.get::<Chain>(next).and_then(|c| c.next);
        }
        chains.push(line);
    }

    RegistrySnapshot {
        instances,
        sent: registry.sent().iter().map(|e| e.to_string()).collect(),
        buffer,
        chains,
    }
}

/// Per-frame registry step: flush the buffer and refresh auto-refreshing
/// entities. Logs the JSON dump when the registry hotkey was pressed.
pub fn registry_update(world: &mut World) -> Result<(), BevyError> {
    let dump = world
        .get_resource::<InputState>()
        .is_some_and(|input| input.dump_registry.just_pressed);
    if dump {
        info!("EM:Debug - {}", serde_json::to_string_pretty(&debug(world))?);
    }

    if world.get_resource_or_init::<EntityRegistry>().has_pending() {
        flush(world)?;
    }

    let mut query = world.query_filtered::<Entity, With<AutoRefresh>>();
    let refreshing: Vec<Entity> = query.iter(world).collect();
    for entity in refreshing {
        if world.resource::<EntityRegistry>().is_tracked(entity) {
            refresh(world, entity)?;
        }
    }
    Ok(())
}

/// Push the current drawable, placement and layer of every registered
/// entity to the render collaborator.
pub fn sync_render(world: &mut World) -> Result<(), BevyError> {
    let Some(registry) = world.get_resource::<EntityRegistry>() else {
        return Ok(());
    };
    let sent = registry.sent();
    let mut updates = Vec::with_capacity(sent.len());
    for entity in sent {
        let Ok(entity_ref) = world.get_entity(entity) else {
            continue;
        };
        let (Some(render), Some(space)) = (entity_ref.get::<Render>(), entity_ref.get::<Space>())
        else {
            continue;
        };
        let z_index = entity_ref.get::<ZIndex>().copied().unwrap_or_default();
        updates.push((entity, render.clone(), *space, z_index.0));
    }

    if let Some(mut bridge) = world.get_resource_mut::<RenderBridge>() {
        for (entity, render, space, z_index) in updates {
            bridge.0.sync(entity, &render, &space, z_index);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::headless::HeadlessRender;

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<EntityRegistry>();
        world.insert_resource(RenderBridge::new(HeadlessRender::new()));
        world
    }

    fn labelled(world: &mut World, label: &str) -> Entity {
        let e = create_entity(world);
        world.entity_mut(e).insert(Reference::new(label));
        e
    }

    #[test]
    fn test_create_is_live_but_unregistered() {
        let mut w = world();
        let e = create_entity(&mut w);
        assert!(w.resource::<EntityRegistry>().is_tracked(e));
        assert!(!w.resource::<RenderBridge>().0.exists(e));
        assert_eq!(get(&w, &[e]), Some(e));
    }

    #[test]
    fn test_flush_registers_children_once() {
        let mut w = world();
        let parent = labelled(&mut w, "parent");
        let child = labelled(&mut w, "child");
        append_child(&mut w, parent, child);

        add(&mut w, &[parent, child]);
        assert_eq!(flush(&mut w).unwrap(), 2);
        assert_eq!(flush(&mut w).unwrap(), 0);

        let bridge = w.resource::<RenderBridge>();
        let render = bridge.backend::<HeadlessRender>().unwrap();
        assert_eq!(render.registrations(parent), 1);
        assert_eq!(render.registrations(child), 1);
    }

    #[test]
    fn test_flush_skips_removed() {
        let mut w = world();
        let e = labelled(&mut w, "gone");
        add(&mut w, &[e]);
        assert!(remove(&mut w, e));
        assert_eq!(flush(&mut w).unwrap(), 0);
        assert!(!w.resource::<EntityRegistry>().has_pending());
    }

    #[test]
    fn test_missing_render_is_fatal() {
        let mut w = world();
        let e = create_entity(&mut w);
        w.entity_mut(e).remove::<Render>();
        add(&mut w, &[e]);
        assert_eq!(
            flush(&mut w),
            Err(CoreError::MissingComponent {
                entity: e,
                component: "Render"
            })
        );
        assert!(!w.resource::<EntityRegistry>().has_pending());
    }

    #[test]
    fn test_unlink_middle_of_chain() {
        let mut w = world();
        let a = labelled(&mut w, "a");
        let b = labelled(&mut w, "b");
        let c = labelled(&mut w, "c");
        append_child(&mut w, a, b);
        append_child(&mut w, a, c);
        add(&mut w, &[a, b, c]);

        assert!(remove(&mut w, b));
        assert_eq!(w.get::<Chain>(a).unwrap().next, Some(c));
        assert_eq!(w.get::<Chain>(c).unwrap().prev, Some(a));
        assert_eq!(children_of(&w, a), vec![c]);
    }

    #[test]
    fn test_remove_unknown_returns_false() {
        let mut w = world();
        let stray = w.spawn_empty().id();
        assert!(!remove(&mut w, stray));
    }

    #[test]
    fn test_copy_takes_fresh_identity() {
        let mut w = world();
        let e = labelled(&mut w, "box");
        w.entity_mut(e).insert(Space::new(4.0, 5.0, 6.0, 7.0));
        let child = labelled(&mut w, "inner");
        append_child(&mut w, e, child);

        let copy = copy(&mut w, e).unwrap();
        assert_ne!(copy, e);
        assert_eq!(w.get::<Reference>(copy).unwrap().as_str(), "copy-box");
        assert_eq!(*w.get::<Space>(copy).unwrap(), Space::new(4.0, 5.0, 6.0, 7.0));
        assert!(children_of(&w, copy).is_empty());
        assert!(w.resource::<EntityRegistry>().has_pending());
    }

    #[test]
    fn test_set_hidden_cascades() {
        let mut w = world();
        let a = create_entity(&mut w);
        let b = create_entity(&mut w);
        let c = create_entity(&mut w);
        append_child(&mut w, a, b);
        append_child(&mut w, b, c);

        assert!(set_hidden(&mut w, a, true));
        assert_eq!(is_hidden(&w, b), Some(true));
        assert_eq!(is_hidden(&w, c), Some(true));
    }

    #[test]
    fn test_debug_lists_chains() {
        let mut w = world();
        let a = labelled(&mut w, "a");
        let b = labelled(&mut w, "b");
        append_child(&mut w, a, b);
        add(&mut w, &[a, b]);

        let snapshot = debug(&w);
        assert_eq!(snapshot.instances.len(), 2);
        assert_eq!(snapshot.buffer.len(), 2);
        assert_eq!(snapshot.chains, vec![format!("{} -> {}", a, b)]);
    }
}

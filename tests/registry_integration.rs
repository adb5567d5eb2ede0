//! Entity registry integration tests: deferred add/flush, processing
//! chains, remove cascade and the per-frame registry step.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test registry_integration
//! ```

use bevy_ecs::prelude::*;

use stagehand::components::chain::Chain;
use stagehand::components::reference::Reference;
use stagehand::components::refresh::AutoRefresh;
use stagehand::components::space::Space;
use stagehand::resources::backend::{InputBridge, RenderBridge};
use stagehand::resources::headless::{HeadlessInput, HeadlessRender};
use stagehand::resources::input::InputState;
use stagehand::resources::registry::EntityRegistry;
use stagehand::systems::registry::{
    add, append_child, children_of, copy, create_entity, debug, flush, get, refresh,
    registry_update, remove, sync_render,
};

fn make_world() -> World {
    let mut world = World::new();
    world.init_resource::<EntityRegistry>();
    world.init_resource::<InputState>();
    world.insert_resource(RenderBridge::new(HeadlessRender::new()));
    world.insert_resource(InputBridge::new(HeadlessInput::new()));
    world
}

fn labelled(world: &mut World, label: &str) -> Entity {
    let e = create_entity(world);
    world.entity_mut(e).insert(Reference::new(label));
    e
}

fn tick_registry(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems((registry_update, sync_render).chain());
    schedule.run(world);
}

fn render(world: &World) -> &HeadlessRender {
    world
        .resource::<RenderBridge>()
        .backend::<HeadlessRender>()
        .unwrap()
}

fn chain(world: &World, e: Entity) -> Chain {
    *world.get::<Chain>(e).unwrap()
}

// =============================================================================
// Add / flush
// =============================================================================

#[test]
fn each_added_entity_reaches_collaborators_exactly_once() {
    let mut world = make_world();
    let a = labelled(&mut world, "a");
    let b = labelled(&mut world, "b");
    let c = labelled(&mut world, "c");
    append_child(&mut world, a, b);

    // a twice, b both directly and as a's child
    add(&mut world, &[a, b, c, a]);
    assert_eq!(flush(&mut world).unwrap(), 3);

    add(&mut world, &[a, c]);
    assert_eq!(flush(&mut world).unwrap(), 0);

    for e in [a, b, c] {
        assert_eq!(render(&world).registrations(e), 1);
        assert!(world
            .resource::<InputBridge>()
            .backend::<HeadlessInput>()
            .unwrap()
            .is_registered(e));
    }
}

#[test]
fn buffered_entity_is_invisible_until_flush() {
    let mut world = make_world();
    let e = labelled(&mut world, "late");
    add(&mut world, &[e]);

    assert_eq!(get(&world, &[e]), Some(e));
    assert!(render(&world).is_empty());
    assert_eq!(debug(&world).buffer.len(), 1);

    flush(&mut world).unwrap();
    assert_eq!(render(&world).len(), 1);
    assert!(debug(&world).buffer.is_empty());
}

#[test]
fn entity_removed_before_flush_is_skipped() {
    let mut world = make_world();
    let parent = labelled(&mut world, "parent");
    let child = labelled(&mut world, "child");
    append_child(&mut world, parent, child);
    add(&mut world, &[parent, child]);

    assert!(remove(&mut world, child));
    assert_eq!(flush(&mut world).unwrap(), 1);
    assert_eq!(render(&world).registrations(parent), 1);
    assert_eq!(render(&world).registrations(child), 0);
}

#[test]
fn flush_on_empty_buffer_is_a_no_op() {
    let mut world = make_world();
    assert_eq!(flush(&mut world).unwrap(), 0);
    assert!(render(&world).is_empty());
}

// =============================================================================
// Chains
// =============================================================================

#[test]
fn add_links_parent_and_children_in_order() {
    let mut world = make_world();
    let a = labelled(&mut world, "a");
    let b = labelled(&mut world, "b");
    let c = labelled(&mut world, "c");
    append_child(&mut world, a, b);
    append_child(&mut world, a, c);

    add(&mut world, &[a]);

    assert_eq!(chain(&world, a).prev, None);
    assert_eq!(chain(&world, a).next, Some(b));
    assert_eq!(chain(&world, b).prev, Some(a));
    assert_eq!(chain(&world, b).next, Some(c));
    assert_eq!(chain(&world, c).prev, Some(b));
    assert_eq!(chain(&world, c).next, None);

    assert_eq!(debug(&world).chains, vec![format!("{} -> {} -> {}", a, b, c)]);
}

#[test]
fn removing_a_middle_link_splices_the_chain() {
    let mut world = make_world();
    let head = labelled(&mut world, "head");
    let b = labelled(&mut world, "b");
    let c = labelled(&mut world, "c");
    let d = labelled(&mut world, "d");
    append_child(&mut world, head, b);
    append_child(&mut world, head, c);
    append_child(&mut world, head, d);
    add(&mut world, &[head]);

    assert!(remove(&mut world, c));
    assert_eq!(chain(&world, b).next, Some(d));
    assert_eq!(chain(&world, d).prev, Some(b));
    assert_eq!(children_of(&world, head), vec![b, d]);
}

#[test]
fn removing_the_chain_head_leaves_the_next_link_headless() {
    let mut world = make_world();
    let head = labelled(&mut world, "head");
    let b = labelled(&mut world, "b");
    let c = labelled(&mut world, "c");
    world.entity_mut(head).insert(Chain {
        prev: None,
        next: Some(b),
    });
    world.entity_mut(b).insert(Chain {
        prev: Some(head),
        next: Some(c),
    });
    world.entity_mut(c).insert(Chain {
        prev: Some(b),
        next: None,
    });

    assert!(remove(&mut world, head));
    assert_eq!(chain(&world, b).prev, None);
    assert_eq!(chain(&world, b).next, Some(c));
    assert_eq!(chain(&world, c).prev, Some(b));
    assert!(world.get_entity(b).is_ok());
}

#[test]
fn live_entities_are_scanned_in_creation_order() {
    let mut world = make_world();
    let first = labelled(&mut world, "first");
    let second = labelled(&mut world, "second");
    let third = labelled(&mut world, "third");

    assert_eq!(
        world.resource::<EntityRegistry>().live(),
        vec![first, second, third]
    );
    let ids: Vec<String> = debug(&world).instances.into_iter().map(|i| i.id).collect();
    assert_eq!(
        ids,
        vec![first.to_string(), second.to_string(), third.to_string()]
    );
}

// =============================================================================
// Remove cascade
// =============================================================================

#[test]
fn remove_cascades_through_descendants() {
    let mut world = make_world();
    let root = labelled(&mut world, "root");
    let mid = labelled(&mut world, "mid");
    let leaf = labelled(&mut world, "leaf");
    let sibling = labelled(&mut world, "sibling");
    append_child(&mut world, root, mid);
    append_child(&mut world, mid, leaf);
    append_child(&mut world, root, sibling);
    add(&mut world, &[root, mid]);
    flush(&mut world).unwrap();

    assert!(remove(&mut world, root));

    // descendants leave the collaborators before their parent
    assert_eq!(render(&world).deregistered(), &[leaf, mid, sibling, root]);
    for e in [root, mid, leaf, sibling] {
        assert_eq!(get(&world, &[e]), None);
        assert!(world.get_entity(e).is_err());
    }
    assert!(render(&world).is_empty());
    assert!(world.resource::<EntityRegistry>().sent().is_empty());
    assert!(debug(&world).instances.is_empty());
}

#[test]
fn remove_twice_fails_the_second_time() {
    let mut world = make_world();
    let e = labelled(&mut world, "once");
    assert!(remove(&mut world, e));
    assert!(!remove(&mut world, e));
}

#[test]
fn get_returns_first_managed_candidate() {
    let mut world = make_world();
    let a = labelled(&mut world, "a");
    let b = labelled(&mut world, "b");
    remove(&mut world, a);
    assert_eq!(get(&world, &[a, b]), Some(b));
    assert_eq!(get(&world, &[a]), None);
}

// =============================================================================
// Copy / refresh / per-frame step
// =============================================================================

#[test]
fn copy_is_flushed_independently() {
    let mut world = make_world();
    let e = labelled(&mut world, "box");
    add(&mut world, &[e]);
    flush(&mut world).unwrap();

    let dup = copy(&mut world, e).unwrap();
    assert_eq!(flush(&mut world).unwrap(), 1);
    assert_eq!(render(&world).registrations(dup), 1);

    assert!(remove(&mut world, dup));
    assert_eq!(get(&world, &[e]), Some(e));
}

#[test]
fn refresh_registers_children_attached_after_flush() {
    let mut world = make_world();
    let parent = labelled(&mut world, "parent");
    add(&mut world, &[parent]);
    flush(&mut world).unwrap();

    let late = labelled(&mut world, "late");
    append_child(&mut world, parent, late);
    assert_eq!(render(&world).registrations(late), 0);

    assert_eq!(refresh(&mut world, parent).unwrap(), 1);
    assert_eq!(refresh(&mut world, parent).unwrap(), 0);
    assert_eq!(render(&world).registrations(late), 1);
}

#[test]
fn registry_tick_flushes_and_auto_refreshes() {
    let mut world = make_world();
    let parent = labelled(&mut world, "panel");
    world
        .entity_mut(parent)
        .insert((AutoRefresh, Space::new(10.0, 20.0, 100.0, 50.0)));
    add(&mut world, &[parent]);

    tick_registry(&mut world);
    let drawn = render(&world).get(parent).unwrap();
    assert_eq!(drawn.space, Space::new(10.0, 20.0, 100.0, 50.0));

    let child = labelled(&mut world, "badge");
    append_child(&mut world, parent, child);
    tick_registry(&mut world);
    assert_eq!(render(&world).registrations(child), 1);

    world.get_mut::<Space>(parent).unwrap().position.x = 99.0;
    tick_registry(&mut world);
    assert_eq!(render(&world).get(parent).unwrap().space.position.x, 99.0);
}

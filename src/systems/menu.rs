//! Menu widget manager.
//!
//! A menu is a container entity (background, optionally draggable), a hidden
//! cursor entity and one text entity per item, parented under the container
//! in display order. Menus are addressed by name through the
//! [`Menus`](crate::resources::menus::Menus) resource.
//!
//! - [`setup`] registers the menu events and subscribes the reactions to
//!   toggle and drag notifications
//! - [`create_menu`] / [`destroy`] build and tear down a menu
//! - [`menu_update`] is the per-frame hover/click scan
//!
//! Items are stacked top to bottom starting at the configured inset from
//! the container, each one advancing by its measured height plus the
//! configured margin.

use bevy_ecs::error::BevyError;
use bevy_ecs::hierarchy::Children;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{error, info, warn};

use crate::components::color::Color;
use crate::components::draggable::Draggable;
use crate::components::menu::Menu;
use crate::components::mouse::MouseState;
use crate::components::reference::Reference;
use crate::components::refresh::AutoRefresh;
use crate::components::render::{Font, Render, Texture};
use crate::components::space::Space;
use crate::components::zindex::ZIndex;
use crate::error::CoreError;
use crate::events::drag::{EVENT_START_DRAG, EVENT_STOP_DRAG};
use crate::events::menu::{EVENT_MENU_ITEM_CLICKED, EVENT_MENU_TOGGLE};
use crate::events::payload::EventPayload;
use crate::resources::config::CoreConfig;
use crate::resources::input::InputState;
use crate::resources::menus::{MenuItemSnapshot, MenuSnapshot, Menus, MenusSnapshot};
use crate::systems::{eventbus, registry, ui};

/// Register the menu events and subscribe to toggle and drag notifications.
///
/// The drag events must already be registered.
pub fn setup(world: &mut World) -> Result<(), CoreError> {
    world.init_resource::<Menus>();
    eventbus::register_event(world, EVENT_MENU_ITEM_CLICKED)?;
    eventbus::register_event(world, EVENT_MENU_TOGGLE)?;
    eventbus::listen(world, EVENT_MENU_TOGGLE, on_menu_toggle)?;
    eventbus::listen(world, EVENT_START_DRAG, on_drag_start)?;
    eventbus::listen(world, EVENT_STOP_DRAG, on_drag_stop)?;
    Ok(())
}

fn config(world: &World) -> CoreConfig {
    world.get_resource::<CoreConfig>().cloned().unwrap_or_default()
}

/// Copy of the menu registered as `name`.
pub fn get_menu(world: &World, name: &str) -> Result<Menu, CoreError> {
    world
        .get_resource::<Menus>()
        .ok_or_else(|| CoreError::UnknownMenu(name.to_string()))?
        .get(name)
        .cloned()
}

/// Names of every active menu, sorted.
pub fn menu_names(world: &World) -> Vec<String> {
    world
        .get_resource::<Menus>()
        .map(Menus::names)
        .unwrap_or_default()
}

fn menus_mut(world: &mut World) -> Mut<'_, Menus> {
    world.get_resource_or_init::<Menus>()
}

/// Item entities of `name`, in display order.
pub fn items(world: &World, name: &str) -> Result<Vec<Entity>, CoreError> {
    let menu = get_menu(world, name)?;
    Ok(registry::children_of(world, menu.container))
}

/// Build a menu and add its container and cursor to the registry.
///
/// The container is placed at `space` with `container_texture` scaled to
/// fit; the cursor starts hidden, sized by the configuration.
#[allow(clippy::too_many_arguments)]
pub fn create_menu(
    world: &mut World,
    name: &str,
    space: Space,
    container_texture: &Texture,
    cursor_texture: &Texture,
    labels: &[&str],
    font: Font,
    draggable: bool,
) -> Result<Menu, CoreError> {
    if menus_mut(world).contains(name) {
        return Err(CoreError::DuplicateMenu(name.to_string()));
    }
    let config = config(world);

    let container = registry::create_entity(world);
    world.entity_mut(container).insert((
        Reference::new(format!("menu-{}-container", name)),
        space,
        Render::fitted(container_texture.clone(), space.width, space.height),
        Draggable {
            enabled: draggable,
            ..Draggable::default()
        },
        ZIndex::UI_BACKGROUND,
        AutoRefresh,
    ));

    let cursor = registry::create_entity(world);
    let mut cursor_render = Render::fitted(
        cursor_texture.clone(),
        config.cursor_width,
        config.cursor_height,
    );
    cursor_render.hidden = true;
    world.entity_mut(cursor).insert((
        Reference::new(format!("menu-{}-cursor", name)),
        Space::new(0.0, 0.0, config.cursor_width, config.cursor_height),
        cursor_render,
        ZIndex::UI,
    ));

    menus_mut(world).insert(Menu::new(name, space, container, cursor, font))?;
    set_items(world, name, labels)?;
    registry::add(world, &[container, cursor]);

    info!("MS:NewMenu - menu {} created", name);
    get_menu(world, name)
}

/// Append one text entity per label under the container of `name`.
pub fn set_items<S: AsRef<str>>(
    world: &mut World,
    name: &str,
    labels: &[S],
) -> Result<Vec<Entity>, CoreError> {
    let menu = get_menu(world, name)?;
    let config = config(world);
    let origin = container_position(world, menu.container)?;

    let mut position = origin + Vec2::new(config.item_start_x, config.item_start_y);
    let mut created = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        let label = label.as_ref();
        let (width, height) = ui::measure_text(world, &menu.font, label);

        let item = registry::create_entity(world);
        world.entity_mut(item).insert((
            Reference::new(format!("menu-{}-item-{}", name, i)),
            Render::text(menu.font.clone(), label),
            Space {
                position,
                width,
                height,
            },
            ZIndex::UI,
        ));
        registry::append_child(world, menu.container, item);
        created.push(item);

        position.y += height + config.item_margin;
    }
    Ok(created)
}

fn container_position(world: &World, container: Entity) -> Result<Vec2, CoreError> {
    world
        .get::<Space>(container)
        .map(|space| space.position)
        .ok_or(CoreError::MissingComponent {
            entity: container,
            component: "Space",
        })
}

/// Re-stack every item from the container's current position.
pub fn align_items(world: &mut World, name: &str) -> Result<(), CoreError> {
    let menu = get_menu(world, name)?;
    let config = config(world);
    let origin = container_position(world, menu.container)?;

    let x = origin.x + config.item_start_x;
    let mut y = origin.y + config.item_start_y;
    for item in registry::children_of(world, menu.container) {
        let height = match world
            .get::<Render>(item)
            .and_then(|render| render.drawable.as_text())
        {
            Some(text) => ui::measure_text(world, &text.font, &text.text).1,
            None => world.get::<Space>(item).map(|s| s.height).unwrap_or(0.0),
        };
        if let Some(mut space) = world.get_mut::<Space>(item) {
            space.position = Vec2::new(x, y);
        }
        if let Some(mut draggable) = world.get_mut::<Draggable>(item) {
            draggable.enabled = false;
        }
        y += height + config.item_margin;
    }
    info!("MS:AlignItems - menu {} items aligned", name);
    Ok(())
}

/// Record `index` as selected and mark that item.
pub fn select_index(world: &mut World, name: &str, index: usize) -> Result<(), CoreError> {
    menus_mut(world).get_mut(name)?.selected = Some(index);
    match items(world, name)?.get(index) {
        Some(&item) => {
            ui::update_text(world, item, None, Color::SELECTED)?;
        }
        None => warn!("MS:SelectIndex - menu {} has no item {}", name, index),
    }
    Ok(())
}

/// Mark the items at `indexes` as disabled; the per-frame scan skips them.
pub fn disable_items(world: &mut World, name: &str, indexes: &[usize]) -> Result<(), CoreError> {
    let items = items(world, name)?;
    for &index in indexes {
        let Some(&item) = items.get(index) else {
            warn!("MS:DisableItems - menu {} has no item {}", name, index);
            continue;
        };
        ui::update_text(world, item, None, Color::DISABLED)?;
        menus_mut(world).get_mut(name)?.disable(item);
    }
    Ok(())
}

pub fn is_disabled(world: &World, name: &str, item: Entity) -> Result<bool, CoreError> {
    Ok(get_menu(world, name)?.is_disabled(item))
}

/// Show the container and every item. The cursor stays as it is.
pub fn show(world: &mut World, name: &str) -> Result<(), CoreError> {
    let menu = get_menu(world, name)?;
    registry::set_hidden(world, menu.container, false);
    Ok(())
}

/// Hide the container, every item and the cursor.
pub fn hide(world: &mut World, name: &str) -> Result<(), CoreError> {
    let menu = get_menu(world, name)?;
    registry::set_hidden(world, menu.container, true);
    registry::set_hidden(world, menu.cursor, true);
    Ok(())
}

/// Restore the default text color of every item.
pub fn reset(world: &mut World, name: &str) -> Result<(), CoreError> {
    let menu = get_menu(world, name)?;
    for item in registry::children_of(world, menu.container) {
        ui::update_text(world, item, None, menu.font.color)?;
    }
    Ok(())
}

/// Remove every item, keeping the container and the cursor.
pub fn clean(world: &mut World, name: &str) -> Result<(), CoreError> {
    let menu = get_menu(world, name)?;
    for item in registry::children_of(world, menu.container) {
        registry::remove(world, item);
    }
    let mut menus = menus_mut(world);
    let menu = menus.get_mut(name)?;
    menu.clear_disabled();
    menu.selected = None;
    Ok(())
}

/// Remove items, cursor and container, then forget the menu.
pub fn destroy(world: &mut World, name: &str) -> Result<(), CoreError> {
    info!("MS:Destroy - destroying menu {}", name);
    clean(world, name)?;
    let menu = get_menu(world, name)?;
    registry::remove(world, menu.cursor);
    registry::remove(world, menu.container);
    menus_mut(world).remove(name);
    Ok(())
}

fn move_cursor_to(world: &mut World, cursor: Entity, item: Entity) {
    let Some(item_space) = world.get::<Space>(item).copied() else {
        return;
    };
    if let Some(mut space) = world.get_mut::<Space>(cursor) {
        space.position = Vec2::new(
            item_space.position.x - space.width,
            item_space.position.y + item_space.height / 2.0 - space.height / 2.0,
        );
    }
    registry::set_hidden(world, cursor, false);
}

/// Per-frame menu step.
///
/// Leaving an item hides the cursor and hovering one moves the cursor next
/// to it. Leaves are applied before enters so that sliding straight from one
/// item to its neighbour keeps the cursor shown. A click on an enabled item
/// then hides the cursor, selects the item and announces it, ending the scan.
pub fn menu_update(world: &mut World) -> Result<(), BevyError> {
    let dump = world
        .get_resource::<InputState>()
        .is_some_and(|input| input.dump_menus.just_pressed);
    if dump {
        info!("MS:Debug - {}", serde_json::to_string_pretty(&debug(world))?);
    }

    for name in menu_names(world) {
        let menu = get_menu(world, &name)?;
        let states: Vec<(usize, Entity, MouseState)> =
            registry::children_of(world, menu.container)
                .into_iter()
                .enumerate()
                .filter(|(_, item)| !menu.is_disabled(*item))
                .filter_map(|(index, item)| {
                    world
                        .get::<MouseState>(item)
                        .map(|mouse| (index, item, *mouse))
                })
                .collect();

        if states.iter().any(|(_, _, mouse)| mouse.leave) {
            registry::set_hidden(world, menu.cursor, true);
        }
        if let Some((_, item, _)) = states.iter().rev().find(|(_, _, mouse)| mouse.enter) {
            move_cursor_to(world, menu.cursor, *item);
        }

        if let Some((index, _, _)) = states.iter().find(|(_, _, mouse)| mouse.clicked) {
            registry::set_hidden(world, menu.cursor, true);
            select_index(world, &name, *index)?;
            eventbus::dispatch(
                world,
                EVENT_MENU_ITEM_CLICKED,
                EventPayload::MenuItem {
                    menu: name.clone(),
                    index: *index,
                },
            )?;
            return Ok(());
        }
    }
    Ok(())
}

/// Flip the visibility of the toggled menu's container and its items.
fn on_menu_toggle(
    In(payload): In<EventPayload>,
    menus: Res<Menus>,
    children: Query<&Children>,
    mut renders: Query<&mut Render>,
) {
    let Some(name) = payload.menu() else {
        warn!("MS:Toggle - payload {} names no menu", payload.describe());
        return;
    };
    let Ok(menu) = menus.get(name) else {
        warn!("MS:Toggle - unknown menu {}", name);
        return;
    };
    let Ok(mut render) = renders.get_mut(menu.container) else {
        return;
    };
    let hidden = !render.hidden;
    render.hidden = hidden;
    for item in children.iter_descendants(menu.container) {
        if let Ok(mut render) = renders.get_mut(item) {
            render.hidden = hidden;
        }
    }
}

/// A dragged container hides its cursor and lets its items follow.
fn on_drag_start(
    In(payload): In<EventPayload>,
    menus: Res<Menus>,
    children: Query<&Children>,
    mut renders: Query<&mut Render>,
    mut draggables: Query<&mut Draggable>,
) {
    let Some(entity) = payload.entity() else {
        return;
    };
    for menu in menus.iter().filter(|menu| menu.container == entity) {
        if let Ok(mut render) = renders.get_mut(menu.cursor) {
            render.hidden = true;
        }
        let Ok(items) = children.get(menu.container) else {
            continue;
        };
        for item in items.to_vec() {
            if let Ok(mut draggable) = draggables.get_mut(item) {
                draggable.enabled = true;
            }
        }
    }
}

/// A dropped container re-aligns its items and returns to the base layer.
fn on_drag_stop(In(payload): In<EventPayload>, world: &mut World) {
    let Some(entity) = payload.entity() else {
        return;
    };
    let Some(name) = world
        .get_resource::<Menus>()
        .and_then(|menus| menus.by_container(entity))
        .map(str::to_string)
    else {
        return;
    };
    if let Err(e) = align_items(world, &name) {
        error!("MS:DragStop - {}", e);
        return;
    }
    if let Some(mut z_index) = world.get_mut::<ZIndex>(entity) {
        *z_index = ZIndex::BASE;
    }
}

/// Dump of every menu with its item labels and disabled state.
pub fn debug(world: &World) -> MenusSnapshot {
    let Some(menus) = world.get_resource::<Menus>() else {
        return MenusSnapshot { menus: Vec::new() };
    };
    let menus = menus
        .iter()
        .map(|menu| MenuSnapshot {
            name: menu.name.clone(),
            selected: menu.selected,
            items: registry::children_of(world, menu.container)
                .into_iter()
                .enumerate()
                .map(|(index, item)| MenuItemSnapshot {
                    index,
                    text: world
                        .get::<Render>(item)
                        .and_then(|render| render.drawable.as_text())
                        .map(|text| text.text.clone())
                        .unwrap_or_default(),
                    disabled: menu.is_disabled(item),
                })
                .collect(),
        })
        .collect();
    MenusSnapshot { menus }
}

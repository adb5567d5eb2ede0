//! World setup and the debug scene.
//!
//! [`install`] inserts every core resource and collaborator into a world and
//! registers the drag and menu events. [`update_schedule`] builds the
//! per-frame schedule. [`setup_debug_scene`] builds the two demo menus used
//! by the binary and the integration tests.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::color::Color;
use crate::components::space::Space;
use crate::components::zindex::ZIndex;
use crate::error::CoreError;
use crate::events::menu::EVENT_MENU_ITEM_CLICKED;
use crate::events::payload::EventPayload;
use crate::resources::backend::{
    AssetBackend, AssetBridge, InputBackend, InputBridge, RenderBackend, RenderBridge,
};
use crate::resources::config::CoreConfig;
use crate::resources::eventbus::EventBus;
use crate::resources::input::InputState;
use crate::resources::menus::Menus;
use crate::resources::registry::EntityRegistry;
use crate::systems::drag::drag_update;
use crate::systems::eventbus::event_bus_update;
use crate::systems::input::poll_input;
use crate::systems::menu::menu_update;
use crate::systems::registry::{registry_update, sync_render};
use crate::systems::{drag, eventbus, menu, ui};

/// Host event announcing a click on an arbitrary target entity.
pub const EVENT_CLICKED: &str = "EventClicked";

pub const TEST_MENU: &str = "test-menu";
pub const TEST_MENU_REFRESH_ITEMS: &str = "test-menu-refresh-items";

/// Fonts the debug scene expects the asset collaborator to provide.
pub const FONTS: [&str; 7] = [
    "CN.ttf",
    "Roboto-Regular.ttf",
    "8-bit-pusab.ttf",
    "8-bit-madness.ttf",
    "8-bit-hud.ttf",
    "8-bit-16.ttf",
    "PixelOperatorSC.ttf",
];

/// Insert the core resources and collaborators, then register the drag and
/// menu events.
pub fn install(
    world: &mut World,
    config: CoreConfig,
    render: impl RenderBackend,
    input: impl InputBackend,
    assets: impl AssetBackend,
) -> Result<(), CoreError> {
    world.insert_resource(config);
    world.insert_resource(InputState::default());
    world.insert_resource(EntityRegistry::default());
    world.insert_resource(EventBus::default());
    world.insert_resource(Menus::default());
    world.insert_resource(RenderBridge::new(render));
    world.insert_resource(InputBridge::new(input));
    world.insert_resource(AssetBridge::new(assets));

    drag::setup(world)?;
    menu::setup(world)?;
    Ok(())
}

/// Per-frame schedule: event bus, registry flush, input poll, drag, menus,
/// then render sync.
pub fn update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            event_bus_update,
            registry_update,
            poll_input,
            drag_update,
            menu_update,
            sync_render,
        )
            .chain(),
    );
    update
}

/// Lines logged by the debug scene's listeners.
#[derive(Resource, Debug, Default)]
pub struct SceneLog(pub Vec<String>);

fn on_item_clicked(In(payload): In<EventPayload>, mut log: ResMut<SceneLog>) {
    let (Some(menu), Some(index)) = (payload.menu(), payload.index()) else {
        return;
    };
    let line = format!("Menu {} item {} clicked", menu, index);
    info!("{}", line);
    log.0.push(line);
}

fn on_target_clicked(In(payload): In<EventPayload>, mut log: ResMut<SceneLog>) {
    let Some(entity) = payload.entity() else {
        return;
    };
    let line = format!("Target {} clicked", entity);
    info!("{}", line);
    log.0.push(line);
}

/// Listeners plus the two demo menus.
///
/// `test-menu` is centered in the window and draggable. The items of
/// `test-menu-refresh-items` are replaced right after creation, before the
/// first flush.
pub fn setup_debug_scene(world: &mut World) -> Result<(), CoreError> {
    world.init_resource::<SceneLog>();
    eventbus::listen(world, EVENT_MENU_ITEM_CLICKED, on_item_clicked)?;
    eventbus::register_event(world, EVENT_CLICKED)?;
    eventbus::listen(world, EVENT_CLICKED, on_target_clicked)?;

    test_menu_component(world)?;
    test_menu_refresh_items(world)?;
    Ok(())
}

fn test_menu_component(world: &mut World) -> Result<(), CoreError> {
    let container = ui::load_texture(world, "box")?;
    let cursor = ui::load_texture(world, "cursor")?;
    let font = ui::load_font(world, "Roboto-Regular.ttf", 26.0, Color::BLACK)?;

    let (window_width, window_height) = world
        .get_resource::<CoreConfig>()
        .map(CoreConfig::window_size)
        .unwrap_or((1280, 900));
    let size = Vec2::new(250.0, 350.0);
    let origin = Vec2::new(window_width as f32, window_height as f32) / 2.0 - size / 2.0;

    let menu = menu::create_menu(
        world,
        TEST_MENU,
        Space::new(origin.x, origin.y, size.x, size.y),
        &container,
        &cursor,
        &["Attack", "Use", "Cast"],
        font,
        true,
    )?;
    world.entity_mut(menu.container).insert(ZIndex::UI);
    Ok(())
}

fn test_menu_refresh_items(world: &mut World) -> Result<(), CoreError> {
    let container = ui::load_texture(world, "box")?;
    let cursor = ui::load_texture(world, "cursor")?;
    let font = ui::load_font(world, "8-bit-hud.ttf", 30.0, Color::BLACK)?;

    let menu = menu::create_menu(
        world,
        TEST_MENU_REFRESH_ITEMS,
        Space::new(50.0, 50.0, 250.0, 350.0),
        &container,
        &cursor,
        &["Attack", "Use", "Cast"],
        font,
        false,
    )?;

    menu::clean(world, TEST_MENU_REFRESH_ITEMS)?;
    menu::set_items(world, TEST_MENU_REFRESH_ITEMS, &["Claw", "Fire", "Recover"])?;
    world.entity_mut(menu.container).insert(ZIndex::UI);
    Ok(())
}

//! Text and asset helpers over the asset collaborator.
//!
//! Loading failures are fatal at the call site: there is no fallback
//! drawable, so they surface as [`CoreError::AssetLoad`].

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::color::Color;
use crate::components::reference::Reference;
use crate::components::render::{Font, Render, Texture};
use crate::components::space::Space;
use crate::components::zindex::ZIndex;
use crate::error::CoreError;
use crate::resources::backend::AssetBridge;
use crate::systems::registry;

fn no_backend() -> CoreError {
    CoreError::AssetLoad("no asset collaborator installed".to_string())
}

/// Load `name` through the asset collaborator.
///
/// A texture with a zero or negative dimension cannot be fitted to a
/// rectangle and is rejected.
pub fn load_texture(world: &mut World, name: &str) -> Result<Texture, CoreError> {
    let mut bridge = world.get_resource_mut::<AssetBridge>().ok_or_else(no_backend)?;
    let texture = bridge.0.load_texture(name)?;
    if texture.width <= 0.0 || texture.height <= 0.0 {
        return Err(CoreError::AssetLoad(format!(
            "texture {} has no area ({}x{})",
            name, texture.width, texture.height
        )));
    }
    debug!("UI:LoadTexture - {} {}x{}", name, texture.width, texture.height);
    Ok(texture)
}

pub fn load_font(world: &mut World, url: &str, size: f32, color: Color) -> Result<Font, CoreError> {
    let mut bridge = world.get_resource_mut::<AssetBridge>().ok_or_else(no_backend)?;
    bridge.0.load_font(url, size, color)
}

/// Width and height of `text` drawn with `font`. Zero without a collaborator.
pub fn measure_text(world: &World, font: &Font, text: &str) -> (f32, f32) {
    world
        .get_resource::<AssetBridge>()
        .map(|bridge| bridge.0.measure_text(font, text))
        .unwrap_or((0.0, 0.0))
}

/// Create a text entity at `space` and add it to the registry.
pub fn new_text(
    world: &mut World,
    text: &str,
    space: Space,
    size: f32,
    font_url: &str,
    color: Color,
) -> Result<Entity, CoreError> {
    let font = load_font(world, font_url, size, color)?;
    let entity = registry::create_entity(world);
    world.entity_mut(entity).insert((
        Render::text(font, text),
        space,
        ZIndex::UI,
        Reference::new(format!("txt-{}", entity)),
    ));
    registry::add(world, &[entity]);
    Ok(entity)
}

/// Replace the text and color of a text entity, keeping its font face and
/// size. `None` keeps the current text.
///
/// Returns false, with a warning, if `entity` does not display text.
pub fn update_text(
    world: &mut World,
    entity: Entity,
    text: Option<&str>,
    color: Color,
) -> Result<bool, CoreError> {
    let Some(current) = world
        .get::<Render>(entity)
        .and_then(|render| render.drawable.as_text())
        .cloned()
    else {
        warn!("UI:UpdateText - entity {} has no text", entity);
        return Ok(false);
    };

    let font = load_font(world, &current.font.url, current.font.size, color)?;
    if let Some(mut render) = world.get_mut::<Render>(entity) {
        if let Some(drawn) = render.drawable.as_text_mut() {
            drawn.font = font;
            if let Some(text) = text {
                drawn.text = text.to_string();
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::headless::HeadlessAssets;

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(AssetBridge::new(
            HeadlessAssets::new()
                .with_texture("box", 50.0, 70.0)
                .with_texture("flat", 0.0, 10.0)
                .with_font("Roboto-Regular.ttf"),
        ));
        world
    }

    #[test]
    fn test_load_texture_rejects_zero_size() {
        let mut w = world();
        assert_eq!(load_texture(&mut w, "box").unwrap().width, 50.0);
        assert!(matches!(
            load_texture(&mut w, "flat"),
            Err(CoreError::AssetLoad(_))
        ));
    }

    #[test]
    fn test_new_text_is_added() {
        let mut w = world();
        let e = new_text(
            &mut w,
            "Hello",
            Space::new(1.0, 2.0, 50.0, 20.0),
            20.0,
            "Roboto-Regular.ttf",
            Color::BLACK,
        )
        .unwrap();
        let render = w.get::<Render>(e).unwrap();
        assert_eq!(render.drawable.as_text().unwrap().text, "Hello");
        assert_eq!(registry::get(&w, &[e]), Some(e));
    }

    #[test]
    fn test_update_text_recolors_and_keeps_text() {
        let mut w = world();
        let e = new_text(
            &mut w,
            "Use",
            Space::default(),
            20.0,
            "Roboto-Regular.ttf",
            Color::BLACK,
        )
        .unwrap();

        assert!(update_text(&mut w, e, None, Color::SELECTED).unwrap());
        let text = w.get::<Render>(e).unwrap().drawable.as_text().cloned().unwrap();
        assert_eq!(text.text, "Use");
        assert_eq!(text.font.color, Color::SELECTED);
        assert_eq!(text.font.size, 20.0);

        assert!(update_text(&mut w, e, Some("Cast"), Color::BLACK).unwrap());
        let text = w.get::<Render>(e).unwrap().drawable.as_text().cloned().unwrap();
        assert_eq!(text.text, "Cast");
    }

    #[test]
    fn test_missing_assets_fail() {
        let mut w = world();
        assert!(matches!(load_texture(&mut w, "nope"), Err(CoreError::AssetLoad(_))));
        assert_eq!(load_texture(&mut w, "box").unwrap().height, 70.0);
        assert!(new_text(&mut w, "x", Space::default(), 10.0, "nope.ttf", Color::BLACK).is_err());

        let plain = registry::create_entity(&mut w);
        assert_eq!(update_text(&mut w, plain, None, Color::BLACK), Ok(false));
    }
}

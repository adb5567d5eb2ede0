//! Headless collaborators.
//!
//! In-memory implementations of the collaborator traits, used by the demo
//! binary and the tests. They need no window, GPU or font files:
//!
//! - [`HeadlessRender`] records what is registered, how often, and the order
//!   of deregistrations
//! - [`HeadlessInput`] hit-tests a scripted pointer against entity rectangles
//! - [`HeadlessAssets`] serves named textures and fonts with monospace metrics

use std::any::Any;

use bevy_ecs::prelude::Entity;
use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::color::Color;
use crate::components::mouse::MouseState;
use crate::components::render::{Font, Render, Texture};
use crate::components::space::Space;
use crate::error::CoreError;
use crate::resources::backend::{AssetBackend, InputBackend, RenderBackend};
use crate::resources::input::Key;

/// Last known state of a drawn entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawn {
    pub render: Render,
    pub space: Space,
    pub z_index: i32,
}

#[derive(Debug, Default)]
pub struct HeadlessRender {
    drawn: FxHashMap<Entity, Drawn>,
    registrations: FxHashMap<Entity, u32>,
    deregistered: Vec<Entity>,
}

impl HeadlessRender {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `entity` was registered over the backend's lifetime.
    pub fn registrations(&self, entity: Entity) -> u32 {
        self.registrations.get(&entity).copied().unwrap_or(0)
    }

    /// Every deregistration received, oldest first.
    pub fn deregistered(&self) -> &[Entity] {
        &self.deregistered
    }

    pub fn get(&self, entity: Entity) -> Option<&Drawn> {
        self.drawn.get(&entity)
    }

    /// Number of entities currently drawn.
    pub fn len(&self) -> usize {
        self.drawn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }
}

impl RenderBackend for HeadlessRender {
    fn register(&mut self, entity: Entity, render: &Render, space: &Space) {
        *self.registrations.entry(entity).or_insert(0) += 1;
        self.drawn.insert(
            entity,
            Drawn {
                render: render.clone(),
                space: *space,
                z_index: 0,
            },
        );
    }

    fn sync(&mut self, entity: Entity, render: &Render, space: &Space, z_index: i32) {
        if let Some(drawn) = self.drawn.get_mut(&entity) {
            drawn.render = render.clone();
            drawn.space = *space;
            drawn.z_index = z_index;
        }
    }

    fn deregister(&mut self, entity: Entity) {
        self.drawn.remove(&entity);
        self.deregistered.push(entity);
    }

    fn exists(&self, entity: Entity) -> bool {
        self.drawn.contains_key(&entity)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Scripted pointer.
///
/// Move the cursor with [`move_to`](Self::move_to) and drive the button with
/// [`press`](Self::press)/[`release`](Self::release); flags are derived by
/// hit-testing each registered entity. [`force`](Self::force) overrides the
/// flags of one entity for the current frame. Edge flags (press, release,
/// keys, forced states) last until [`end_frame`](InputBackend::end_frame).
#[derive(Debug, Default)]
pub struct HeadlessInput {
    cursor: Vec2,
    button_down: bool,
    just_pressed: bool,
    just_released: bool,
    registered: FxHashSet<Entity>,
    hovered: FxHashSet<Entity>,
    forced: FxHashMap<Entity, MouseState>,
    keys: FxHashSet<Key>,
}

impl HeadlessInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    pub fn press(&mut self) {
        if !self.button_down {
            self.just_pressed = true;
        }
        self.button_down = true;
    }

    pub fn release(&mut self) {
        if self.button_down {
            self.just_released = true;
        }
        self.button_down = false;
    }

    pub fn press_key(&mut self, key: Key) {
        self.keys.insert(key);
    }

    /// Report `state` for `entity` this frame instead of hit-testing it.
    pub fn force(&mut self, entity: Entity, state: MouseState) {
        self.forced.insert(entity, state);
    }

    pub fn is_registered(&self, entity: Entity) -> bool {
        self.registered.contains(&entity)
    }
}

impl InputBackend for HeadlessInput {
    fn register(&mut self, entity: Entity) {
        self.registered.insert(entity);
    }

    fn deregister(&mut self, entity: Entity) {
        self.registered.remove(&entity);
        self.hovered.remove(&entity);
        self.forced.remove(&entity);
    }

    fn cursor(&self) -> Vec2 {
        self.cursor
    }

    fn mouse_state(&mut self, entity: Entity, space: &Space, hidden: bool) -> MouseState {
        if !self.registered.contains(&entity) {
            return MouseState::default();
        }
        if let Some(state) = self.forced.remove(&entity) {
            return state;
        }

        let inside = !hidden && space.contains(self.cursor);
        let was_hovered = if inside {
            !self.hovered.insert(entity)
        } else {
            self.hovered.remove(&entity)
        };
        MouseState {
            enter: inside && !was_hovered,
            leave: !inside && was_hovered,
            clicked: inside && self.just_pressed,
            released: inside && self.just_released,
        }
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn end_frame(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
        self.keys.clear();
        self.forced.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Named textures and fonts.
///
/// Text metrics are monospace: each character is half the font size wide and
/// a line is exactly the font size tall.
#[derive(Debug, Default)]
pub struct HeadlessAssets {
    textures: FxHashMap<String, (f32, f32)>,
    fonts: FxHashSet<String>,
}

impl HeadlessAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a texture of the given native size available under `name`.
    pub fn with_texture(mut self, name: impl Into<String>, width: f32, height: f32) -> Self {
        self.textures.insert(name.into(), (width, height));
        self
    }

    pub fn with_font(mut self, url: impl Into<String>) -> Self {
        self.fonts.insert(url.into());
        self
    }
}

impl AssetBackend for HeadlessAssets {
    fn load_texture(&mut self, name: &str) -> Result<Texture, CoreError> {
        let (width, height) = self
            .textures
            .get(name)
            .copied()
            .ok_or_else(|| CoreError::AssetLoad(format!("texture {name} not found")))?;
        Ok(Texture {
            key: name.to_string(),
            width,
            height,
        })
    }

    fn load_font(&mut self, url: &str, size: f32, color: Color) -> Result<Font, CoreError> {
        if !self.fonts.contains(url) {
            return Err(CoreError::AssetLoad(format!("font {url} not found")));
        }
        Ok(Font {
            url: url.to_string(),
            size,
            color,
        })
    }

    fn measure_text(&self, font: &Font, text: &str) -> (f32, f32) {
        let chars = text.chars().count() as f32;
        (chars * font.size * 0.5, font.size)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

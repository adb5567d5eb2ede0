//! Collaborator seams.
//!
//! Rendering, pointer input and asset loading are not part of the core. The
//! core talks to them through three traits, each stored in the world behind a
//! bridge resource:
//!
//! - [`RenderBackend`] in [`RenderBridge`] – registration of drawables
//! - [`InputBackend`] in [`InputBridge`] – per-entity pointer flags, cursor, hotkeys
//! - [`AssetBackend`] in [`AssetBridge`] – textures, fonts and text metrics
//!
//! The collaborators' internal indices are not reentrant-safe: the core only
//! registers entities at the flush barrier, never while a frame iterates the
//! live set. Headless implementations live in
//! [`headless`](crate::resources::headless).

use std::any::Any;

use bevy_ecs::prelude::{Entity, Resource};
use glam::Vec2;

use crate::components::color::Color;
use crate::components::mouse::MouseState;
use crate::components::render::{Font, Render, Texture};
use crate::components::space::Space;
use crate::error::CoreError;
use crate::resources::input::Key;

pub trait RenderBackend: Send + Sync + 'static {
    /// Start drawing `entity`.
    fn register(&mut self, entity: Entity, render: &Render, space: &Space);
    /// Push the current state of an already registered entity.
    fn sync(&mut self, entity: Entity, render: &Render, space: &Space, z_index: i32);
    fn deregister(&mut self, entity: Entity);
    fn exists(&self, entity: Entity) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub trait InputBackend: Send + Sync + 'static {
    /// Start reporting pointer flags for `entity`.
    fn register(&mut self, entity: Entity);
    fn deregister(&mut self, entity: Entity);
    /// Global cursor position.
    fn cursor(&self) -> Vec2;
    /// This frame's flags for a registered entity occupying `space`.
    fn mouse_state(&mut self, entity: Entity, space: &Space, hidden: bool) -> MouseState;
    fn is_key_pressed(&self, key: Key) -> bool;
    /// Called once all entities were polled for the frame.
    fn end_frame(&mut self) {}
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub trait AssetBackend: Send + Sync + 'static {
    fn load_texture(&mut self, name: &str) -> Result<Texture, CoreError>;
    fn load_font(&mut self, url: &str, size: f32, color: Color) -> Result<Font, CoreError>;
    /// Width and height of `text` drawn with `font`.
    fn measure_text(&self, font: &Font, text: &str) -> (f32, f32);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[derive(Resource)]
pub struct RenderBridge(pub Box<dyn RenderBackend>);

#[derive(Resource)]
pub struct InputBridge(pub Box<dyn InputBackend>);

#[derive(Resource)]
pub struct AssetBridge(pub Box<dyn AssetBackend>);

impl RenderBridge {
    pub fn new(backend: impl RenderBackend) -> Self {
        Self(Box::new(backend))
    }

    /// The concrete backend, if it is a `T`.
    pub fn backend<T: RenderBackend>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn backend_mut<T: RenderBackend>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }
}

impl InputBridge {
    pub fn new(backend: impl InputBackend) -> Self {
        Self(Box::new(backend))
    }

    pub fn backend<T: InputBackend>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn backend_mut<T: InputBackend>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }
}

impl AssetBridge {
    pub fn new(backend: impl AssetBackend) -> Self {
        Self(Box::new(backend))
    }

    pub fn backend<T: AssetBackend>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn backend_mut<T: AssetBackend>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }
}

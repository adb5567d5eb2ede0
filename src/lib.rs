//! Stagehand library.
//!
//! Runtime core of a small entity-component framework for interactive 2D
//! scenes: entity registry with deferred add/flush, named event bus, drag
//! controller and menu widgets, all living in one `bevy_ecs` world.

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod scene;
pub mod systems;

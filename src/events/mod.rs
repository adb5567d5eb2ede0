//! Event names and payloads exchanged over the event bus.
//!
//! Components never call each other directly; they publish and subscribe to
//! named events through the [`EventBus`](crate::resources::eventbus::EventBus).
//! This module groups the names each component registers and the payload
//! type every event carries.
//!
//! Submodules:
//! - [`drag`] – drag started/stopped notifications from the drag controller
//! - [`menu`] – item clicked and menu toggle events owned by the menu manager
//! - [`payload`] – the tagged payload attached at dispatch time
pub mod drag;
pub mod menu;
pub mod payload;

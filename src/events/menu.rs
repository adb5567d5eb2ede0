//! Events owned by the menu manager.
//!
//! Registered by [`menu::setup`](crate::systems::menu::setup).
//!
//! # Example
//!
//! ```ignore
//! eventbus::listen(world, EVENT_MENU_ITEM_CLICKED, |In(payload): In<EventPayload>| {
//!     if let EventPayload::MenuItem { menu, index } = payload {
//!         log::info!("Menu {menu} item {index} clicked");
//!     }
//! })?;
//! ```

/// Published when an enabled item is clicked. Payload:
/// [`EventPayload::MenuItem`](super::payload::EventPayload::MenuItem).
pub const EVENT_MENU_ITEM_CLICKED: &str = "EventMenuItemClicked";
/// Dispatch to flip a menu's visibility. Payload:
/// [`EventPayload::Menu`](super::payload::EventPayload::Menu).
pub const EVENT_MENU_TOGGLE: &str = "EventMenuToggle";

//! Error type shared by the registry, event bus, drag controller and menus.
//!
//! Only programmer/usage errors travel through [`CoreError`]. Consistency
//! problems that can be skipped (an entity removed before it was flushed, a
//! child that is no longer tracked) are logged with `log::warn!` by the
//! operation that meets them and never reach the caller as an error.

use bevy_ecs::entity::Entity;
use std::fmt;

/// Unrecoverable usage errors raised by core operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// An event name was registered twice.
    DuplicateEvent(String),
    /// An operation referenced an event name that was never registered.
    UnknownEvent(String),
    /// No event record carries the given identity.
    EventNotFound(Entity),
    /// A menu with this name already exists.
    DuplicateMenu(String),
    /// An operation referenced a menu that does not exist.
    UnknownMenu(String),
    /// A managed entity lacks state every managed entity must carry.
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },
    /// A subscriber could not be run while dispatching an event.
    Handler { event: String, reason: String },
    /// A texture or font could not be provided by the asset collaborator.
    AssetLoad(String),
    /// The configuration file could not be read or written.
    Config(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::DuplicateEvent(name) => write!(f, "event {name} already exists"),
            CoreError::UnknownEvent(name) => write!(f, "unknown event {name}"),
            CoreError::EventNotFound(id) => write!(f, "event {id} not found"),
            CoreError::DuplicateMenu(name) => write!(f, "menu {name} already exists"),
            CoreError::UnknownMenu(name) => write!(f, "unknown menu {name}"),
            CoreError::MissingComponent { entity, component } => {
                write!(f, "entity {entity} missing {component}")
            }
            CoreError::Handler { event, reason } => {
                write!(f, "handler for event {event} failed: {reason}")
            }
            CoreError::AssetLoad(e) => write!(f, "asset load failed: {e}"),
            CoreError::Config(e) => write!(f, "config error: {e}"),
        }
    }
}

impl std::error::Error for CoreError {}

//! Payload carried by a dispatched event.
//!
//! Each dispatch replaces the event's payload; nothing accumulates. The core
//! events use the typed variants; host applications that need an ad-hoc bag
//! of values can use [`EventPayload::Data`].

use bevy_ecs::prelude::Entity;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventPayload {
    #[default]
    Empty,
    /// A managed entity (drag started/stopped, host "clicked" events).
    Entity(Entity),
    /// A menu, addressed by name (menu toggle).
    Menu { menu: String },
    /// An item of a menu, by position among the container's children.
    MenuItem { menu: String, index: usize },
    /// Free-form key/value data for host-defined events.
    Data(Map<String, Value>),
}

impl EventPayload {
    pub fn entity(&self) -> Option<Entity> {
        match self {
            EventPayload::Entity(entity) => Some(*entity),
            _ => None,
        }
    }

    /// Name of the menu this payload refers to, if any.
    pub fn menu(&self) -> Option<&str> {
        match self {
            EventPayload::Menu { menu } | EventPayload::MenuItem { menu, .. } => Some(menu),
            _ => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            EventPayload::MenuItem { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Short description used in debug dumps.
    pub fn describe(&self) -> String {
        match self {
            EventPayload::Empty => "empty".to_string(),
            EventPayload::Entity(entity) => format!("entity {entity}"),
            EventPayload::Menu { menu } => format!("menu {menu}"),
            EventPayload::MenuItem { menu, index } => format!("menu {menu} item {index}"),
            EventPayload::Data(map) => Value::Object(map.clone()).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    #[test]
    fn test_accessors() {
        let mut world = World::new();
        let e = world.spawn_empty().id();

        assert_eq!(EventPayload::Entity(e).entity(), Some(e));
        assert_eq!(EventPayload::Empty.entity(), None);

        let item = EventPayload::MenuItem {
            menu: "m".into(),
            index: 2,
        };
        assert_eq!(item.menu(), Some("m"));
        assert_eq!(item.index(), Some(2));
        assert_eq!(EventPayload::Menu { menu: "x".into() }.index(), None);
    }

    #[test]
    fn test_describe_data_as_json() {
        let mut map = Map::new();
        map.insert("score".into(), Value::from(3));
        assert_eq!(EventPayload::Data(map).describe(), r#"{"score":3}"#);
    }
}

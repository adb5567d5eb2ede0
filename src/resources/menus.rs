//! Active menus, addressed by name.
//!
//! Menu names are unique: inserting a second menu under an existing name is a
//! usage error. Iteration is name-ordered, so "first match wins" scans in
//! [`menu_update`](crate::systems::menu::menu_update) are deterministic.

use std::collections::BTreeMap;

use bevy_ecs::prelude::{Entity, Resource};
use serde::Serialize;

use crate::components::menu::Menu;
use crate::error::CoreError;

#[derive(Resource, Debug, Default)]
pub struct Menus {
    menus: BTreeMap<String, Menu>,
}

impl Menus {
    pub fn insert(&mut self, menu: Menu) -> Result<(), CoreError> {
        if self.menus.contains_key(&menu.name) {
            return Err(CoreError::DuplicateMenu(menu.name));
        }
        self.menus.insert(menu.name.clone(), menu);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.menus.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&Menu, CoreError> {
        self.menus
            .get(name)
            .ok_or_else(|| CoreError::UnknownMenu(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Menu, CoreError> {
        self.menus
            .get_mut(name)
            .ok_or_else(|| CoreError::UnknownMenu(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Option<Menu> {
        self.menus.remove(name)
    }

    /// Name of the menu whose container is `container`, if any.
    pub fn by_container(&self, container: Entity) -> Option<&str> {
        self.menus
            .values()
            .find(|menu| menu.container == container)
            .map(|menu| menu.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Menu> {
        self.menus.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.menus.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItemSnapshot {
    pub index: usize,
    pub text: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuSnapshot {
    pub name: String,
    pub selected: Option<usize>,
    pub items: Vec<MenuItemSnapshot>,
}

/// Textual dump of every menu, produced by
/// [`menu::debug`](crate::systems::menu::debug).
#[derive(Debug, Clone, Serialize)]
pub struct MenusSnapshot {
    pub menus: Vec<MenuSnapshot>,
}

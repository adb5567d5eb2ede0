use bevy_ecs::prelude::Entity;
use smallvec::SmallVec;

use crate::components::render::Font;
use crate::components::space::Space;

/// A named composite widget: one container, one cursor and the container's
/// tree children as items.
///
/// The menu only stores identities; the entities themselves are owned by the
/// [`EntityRegistry`](crate::resources::registry::EntityRegistry). Items are
/// not listed here: they are the container's `Children`, in order.
#[derive(Clone, Debug)]
pub struct Menu {
    pub name: String,
    /// Geometry requested at creation time.
    pub space: Space,
    /// Background and drag surface; parent of every item.
    pub container: Entity,
    /// Hover indicator, hidden until an item is hovered.
    pub cursor: Entity,
    pub selected: Option<usize>,
    /// Items skipped by the hover/click scan.
    pub disabled: SmallVec<[Entity; 4]>,
    /// Font used for the item labels.
    pub font: Font,
}

impl Menu {
    pub fn new(
        name: impl Into<String>,
        space: Space,
        container: Entity,
        cursor: Entity,
        font: Font,
    ) -> Self {
        Self {
            name: name.into(),
            space,
            container,
            cursor,
            selected: None,
            disabled: SmallVec::new(),
            font,
        }
    }

    pub fn is_disabled(&self, item: Entity) -> bool {
        self.disabled.contains(&item)
    }

    /// Add `item` to the disabled set. Returns false if it was already there.
    pub fn disable(&mut self, item: Entity) -> bool {
        if self.is_disabled(item) {
            return false;
        }
        self.disabled.push(item);
        true
    }

    pub fn clear_disabled(&mut self) {
        self.disabled.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::color::Color;
    use bevy_ecs::world::World;

    fn font() -> Font {
        Font {
            url: "Roboto-Regular.ttf".into(),
            size: 26.0,
            color: Color::BLACK,
        }
    }

    #[test]
    fn test_disable_is_idempotent() {
        let mut world = World::new();
        let container = world.spawn_empty().id();
        let cursor = world.spawn_empty().id();
        let item = world.spawn_empty().id();

        let mut menu = Menu::new("m", Space::default(), container, cursor, font());
        assert!(menu.selected.is_none());
        assert!(!menu.is_disabled(item));
        assert!(menu.disable(item));
        assert!(!menu.disable(item));
        assert_eq!(menu.disabled.len(), 1);
        assert!(menu.is_disabled(item));

        menu.clear_disabled();
        assert!(!menu.is_disabled(item));
    }
}

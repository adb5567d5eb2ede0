//! Z-index component for render ordering.
//!
//! The [`ZIndex`] component provides a simple way to control the drawing
//! order of entities. Entities with higher z-index values are drawn on top
//! of those with lower values.

use bevy_ecs::prelude::Component;

/// Rendering order hint for 2D drawing.
///
/// Higher values are drawn later (on top). The render collaborator sorts by
/// `ZIndex` to achieve a painter's algorithm.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Default layer for scene entities.
    pub const BASE: ZIndex = ZIndex(0);
    /// Backgrounds of UI widgets (menu containers).
    pub const UI_BACKGROUND: ZIndex = ZIndex(10);
    /// UI foreground (menu items and cursors).
    pub const UI: ZIndex = ZIndex(11);
}

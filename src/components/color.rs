//! RGBA color used for text styling.
//!
//! The render collaborator owns the actual drawing; the core only records the
//! color a text drawable should use so menus can mark items as selected or
//! disabled without touching structure.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    /// Color of the selected menu item.
    pub const SELECTED: Color = Color::new(255, 0, 0, 255);
    /// Color of disabled menu items.
    pub const DISABLED: Color = Color::new(0, 0, 0, 100);

    /// Create a new color from its RGBA channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

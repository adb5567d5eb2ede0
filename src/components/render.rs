//! Render state of a managed entity.
//!
//! The [`Render`] component holds the opaque drawable handed to the render
//! collaborator together with the flags the collaborator reads every frame
//! (visibility and scale). The core never draws anything itself.
//!
//! Drawables come in two shapes:
//! - [`Texture`] – an image loaded by the asset collaborator, with its
//!   native size
//! - [`Text`] – a string rendered with a [`Font`]

use bevy_ecs::prelude::Component;
use glam::Vec2;
use serde::Serialize;

use crate::components::color::Color;

/// Handle to a texture owned by the asset collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Texture {
    /// Key the texture was loaded under.
    pub key: String,
    /// Native width in pixels.
    pub width: f32,
    /// Native height in pixels.
    pub height: f32,
}

/// Font descriptor: the loaded font file, its size and the text color.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Font {
    pub url: String,
    pub size: f32,
    pub color: Color,
}

/// A string drawn with a font.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Text {
    pub font: Font,
    pub text: String,
}

/// Anything the render collaborator knows how to draw.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub enum Drawable {
    #[default]
    None,
    Texture(Texture),
    Text(Text),
}

impl Drawable {
    /// The text payload, if this is a text drawable.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Drawable::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Mutable access to the text payload, if this is a text drawable.
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Drawable::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Render {
    pub drawable: Drawable,
    pub hidden: bool,
    /// Scale applied to the drawable's native size.
    pub scale: Vec2,
}

impl Default for Render {
    fn default() -> Self {
        Self {
            drawable: Drawable::None,
            hidden: false,
            scale: Vec2::ONE,
        }
    }
}

impl Render {
    /// Render state for a texture stretched to `width` x `height`.
    pub fn fitted(texture: Texture, width: f32, height: f32) -> Self {
        let scale = Vec2::new(width / texture.width, height / texture.height);
        Self {
            drawable: Drawable::Texture(texture),
            hidden: false,
            scale,
        }
    }

    /// Render state for a text drawable at native scale.
    pub fn text(font: Font, text: impl Into<String>) -> Self {
        Self {
            drawable: Drawable::Text(Text {
                font,
                text: text.into(),
            }),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(w: f32, h: f32) -> Texture {
        Texture {
            key: "box".into(),
            width: w,
            height: h,
        }
    }

    #[test]
    fn test_default_visible_unit_scale() {
        let r = Render::default();
        assert!(!r.hidden);
        assert_eq!(r.scale, Vec2::ONE);
        assert_eq!(r.drawable, Drawable::None);
    }

    #[test]
    fn test_fitted_scales_to_target_size() {
        let r = Render::fitted(texture(50.0, 70.0), 250.0, 350.0);
        assert_eq!(r.scale, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_text_accessors() {
        let font = Font {
            url: "Roboto-Regular.ttf".into(),
            size: 26.0,
            color: Color::BLACK,
        };
        let mut r = Render::text(font, "Attack");
        assert_eq!(r.drawable.as_text().map(|t| t.text.as_str()), Some("Attack"));
        if let Some(t) = r.drawable.as_text_mut() {
            t.font.color = Color::SELECTED;
        }
        assert_eq!(r.drawable.as_text().unwrap().font.color, Color::SELECTED);
        assert!(Drawable::Texture(texture(1.0, 1.0)).as_text().is_none());
    }
}

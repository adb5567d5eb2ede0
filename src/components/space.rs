//! Spatial rectangle component.
//!
//! Every managed entity is an axis-aligned rectangle: a top-left position plus
//! a width and a height. There is no rotation or skew.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Position and size of a managed entity, in screen pixels.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Space {
    /// Top-left corner.
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Space {
    /// Create a Space from a position and a size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            width,
            height,
        }
    }

    /// Size as a vector (width, height).
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Centre point of the rectangle.
    pub fn center(&self) -> Vec2 {
        self.position + self.size() * 0.5
    }

    /// Whether `point` lies inside the rectangle (edges included).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x <= self.position.x + self.width
            && point.y <= self.position.y + self.height
    }
}

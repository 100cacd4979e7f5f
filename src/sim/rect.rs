//! Axis-aligned rectangles in field space
//!
//! Field space has x growing right and y growing down (toward the player),
//! matching the direction the rows scroll.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (`min` = top-left, `max` = bottom-right)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from a top-left corner and a size
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Positive, finite extent on both axes
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.height() > 0.0
    }

    /// Same rectangle moved so its center sits at `x` horizontally
    pub fn centered_at_x(&self, x: f32) -> Self {
        let half = self.width() * 0.5;
        Self {
            min: Vec2::new(x - half, self.min.y),
            max: Vec2::new(x + half, self.max.y),
        }
    }
}

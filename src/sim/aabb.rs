//! Axis-aligned bounding boxes for sprite-sized entities
//!
//! Every entity is positioned by its centre; its box is derived from the
//! centre plus the sprite size reported by the asset provider.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in field space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of `size` centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Top edge (smallest y)
    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    /// Strict overlap: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

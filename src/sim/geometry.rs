//! Axis-aligned boxes in normalized playfield space
//!
//! A box is defined by:
//! - center: midpoint in the unit square
//! - half_extents: half-width and half-height
//!
//! Containment is strict (`<`), matching how paddle and brick hits are tested.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Center point
    pub center: Vec2,
    /// Half-width (x) and half-height (y)
    pub half_extents: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Check if a point lies strictly inside the box
    pub fn contains_point(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x < self.half_extents.x && d.y < self.half_extents.y
    }
}

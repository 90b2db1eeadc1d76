//! Widget-local geometry and the projection of tiles into pixels.

pub use glam::{Vec2, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::SwipeAxis;
use crate::tile::TileVisual;

/// A position in widget-local coordinates (pixels, origin top-left).
pub type Point = Vec2;

/// Size of the widget in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Point {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height).max(0.0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(320.0, 480.0)
    }
}

/// Axis-aligned rectangle in widget-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_center(center: Point, half: Vec2) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
    }

    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Maps tile units onto widget pixels.
///
/// One tile unit equals `viewport.min_side() * display_ratio` pixels, which
/// is also the drag distance that moves the focus offset by one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub viewport: Viewport,
    pub unit_px: f32,
    pub axis: SwipeAxis,
}

impl Projection {
    pub fn new(viewport: Viewport, display_ratio: f32, axis: SwipeAxis) -> Self {
        Self {
            viewport,
            unit_px: (viewport.min_side() * display_ratio).max(1.0),
            axis,
        }
    }

    /// Pixel distance between the focused tile and a tile one unit away.
    #[inline]
    pub fn pitch_px(&self) -> f32 {
        self.unit_px
    }

    /// Screen-space footprint of a tile.
    ///
    /// The extent along the swipe axis shrinks with `cos(rotation)` so a
    /// turned tile only covers the area it visibly occupies.
    pub fn footprint(&self, tile: &TileVisual) -> Rect {
        let lateral = match self.axis {
            SwipeAxis::Horizontal => tile.translation.x,
            SwipeAxis::Vertical => tile.translation.y,
        };
        let center = self.viewport.center() + self.axis.unit() * lateral * self.unit_px;
        let along = tile.rotation.cos().abs();
        let half = match self.axis {
            SwipeAxis::Horizontal => {
                Vec2::new(tile.extent.x * along, tile.extent.y)
            }
            SwipeAxis::Vertical => {
                Vec2::new(tile.extent.x, tile.extent.y * along)
            }
        } * tile.scale
            * self.unit_px;
        Rect::from_center(center, half)
    }
}

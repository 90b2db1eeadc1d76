use glam::{Vec2, Vec3};

use crate::config::Reflection;

/// Everything a rasterizer needs to draw one tile for one frame.
///
/// Derived fresh on every redraw from the focus offset and the layout
/// configuration; it has no identity beyond `index` and is never diffed.
///
/// Units are tile units: the tile's longer side is `1.0`. The lateral
/// translation lies on the swipe axis (`x` for horizontal, `y` for
/// vertical); `z` is negative for tiles pushed away from the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileVisual {
    /// Index into the data source.
    pub index: usize,
    /// `index - offset`; negative before the focused tile.
    pub relative: f32,
    pub translation: Vec3,
    /// Radians about the in-plane axis perpendicular to the swipe axis.
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    pub reflection: Reflection,
    /// Half-extents of the tile quad in tile units.
    pub extent: Vec2,
}

impl TileVisual {
    /// True when this tile sits exactly on the focus point.
    pub fn is_centered(&self) -> bool {
        self.relative == 0.0
    }

    /// Distance from the focus point, used for draw ordering.
    pub fn distance(&self) -> f32 {
        self.relative.abs()
    }
}

/// Half-extents of a tile quad for a width/height aspect ratio.
///
/// The longer side always spans one tile unit.
pub fn extent_for_aspect(aspect: f32) -> Vec2 {
    if !aspect.is_finite() || aspect <= 0.0 {
        return Vec2::splat(0.5);
    }
    if aspect >= 1.0 {
        Vec2::new(0.5, 0.5 / aspect)
    } else {
        Vec2::new(0.5 * aspect, 0.5)
    }
}

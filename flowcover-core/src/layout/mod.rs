//! Per-tile geometry as a pure function of the focus offset
//!
//! Nothing here keeps state between frames: the same offset, tile count and
//! [`LayoutConfig`] always produce bit-identical [`TileVisual`]s.
//!
//! With `d = index - offset`, `a = |d|` and `t = min(a, 1)`:
//!
//! - lateral position: `sign(d) * (t * FLANK_GAP + max(a - 1, 0) * pitch)`
//!   with `pitch = PACK_PITCH_BASE + PACK_PITCH_SPREAD * spread`
//! - rotation: `facing * sign(d) * acos(rotation) * t`; positive turns the
//!   tile's outer edge away from the viewer
//! - depth: `-depth * a * DEPTH_STEP`, scale `1 / (1 + depth * a)`
//! - opacity: `(1 - alpha * min(a / (N + 1), 1)) * clamp(N + 1 - a, 0, 1)`

pub mod config;
pub mod window;

pub use config::LayoutConfig;
pub use window::visible_range;

use std::cmp::Ordering;

use flowcover_model::{Point, Projection, TileVisual, Vec3, extent_for_aspect};

use crate::constants::layout::{DEPTH_STEP, FLANK_GAP, PACK_PITCH_BASE, PACK_PITCH_SPREAD};

/// Visual parameters of one tile.
pub fn tile_visual(index: usize, offset: f32, cfg: &LayoutConfig) -> TileVisual {
    let d = index as f32 - offset;
    let a = d.abs();
    let side = if d < 0.0 { -1.0 } else { 1.0 };
    let near = a.min(1.0);

    let pitch = PACK_PITCH_BASE + PACK_PITCH_SPREAD * cfg.spread;
    let lateral = side * (near * FLANK_GAP + (a - 1.0).max(0.0) * pitch);
    let along = cfg.axis.unit() * lateral;

    let rotation = cfg.facing.sign() * side * cfg.rotation.acos() * near;

    let edge = cfg.window_radius as f32 + 1.0;
    let fade = 1.0 - cfg.alpha * (a / edge).min(1.0);
    let opacity = fade * (edge - a).clamp(0.0, 1.0);

    TileVisual {
        index,
        relative: d,
        translation: Vec3::new(along.x, along.y, -cfg.depth * a * DEPTH_STEP),
        rotation,
        scale: 1.0 / (1.0 + cfg.depth * a),
        opacity,
        reflection: cfg.reflection,
        extent: extent_for_aspect(cfg.tile_aspect),
    }
}

/// Every tile in the visible window, back to front.
///
/// Indices outside `0..tile_count` are never emitted, so a host whose count
/// shrank between calls gets a shorter list rather than a failure.
pub fn layout(offset: f32, tile_count: usize, cfg: &LayoutConfig) -> Vec<TileVisual> {
    let mut tiles: Vec<TileVisual> = visible_range(offset, tile_count, cfg.window_radius)
        .map(|index| tile_visual(index, offset, cfg))
        .collect();
    tiles.sort_by(back_to_front);
    tiles
}

fn back_to_front(a: &TileVisual, b: &TileVisual) -> Ordering {
    b.distance()
        .total_cmp(&a.distance())
        .then_with(|| a.index.cmp(&b.index))
}

/// Index of the front-most tile under `point`.
///
/// `visuals` must be in the back-to-front order produced by [`layout`].
/// Fully transparent tiles are ignored.
pub fn hit_test(point: Point, visuals: &[TileVisual], projection: &Projection) -> Option<usize> {
    visuals
        .iter()
        .rev()
        .filter(|tile| tile.opacity > 0.0)
        .find(|tile| projection.footprint(tile).contains(point))
        .map(|tile| tile.index)
}

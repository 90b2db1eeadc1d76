//! Visual style of the tile row

use flowcover_model::error::{ensure_above, ensure_in_range};
use flowcover_model::{ConfigError, Facing, Projection, Reflection, SwipeAxis, Viewport};
use serde::{Deserialize, Serialize};

use crate::constants::layout;

/// Parameters of the perspective layout.
///
/// Each field can be changed independently at any time; the next frame
/// picks the new value up. The setters validate and leave the old value in
/// place on error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub axis: SwipeAxis,
    pub facing: Facing,
    /// Packing of tiles beyond the immediate neighbours, in [-1, 1].
    pub spread: f32,
    /// Cosine of the largest rotation, in [0, 1]. 1 keeps tiles flat.
    pub rotation: f32,
    /// How far tiles recede with distance, in [0, 1].
    pub depth: f32,
    /// How strongly tiles fade with distance, in [0, 1].
    pub alpha: f32,
    pub reflection: Reflection,
    /// Tiles drawn on each side of the focused one.
    pub window_radius: usize,
    /// Share of the viewport's shorter side spanned by one tile unit.
    pub display_ratio: f32,
    /// Width / height of each tile.
    pub tile_aspect: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            axis: SwipeAxis::default(),
            facing: Facing::default(),
            spread: layout::SPREAD,
            rotation: layout::ROTATION,
            depth: layout::DEPTH,
            alpha: layout::ALPHA,
            reflection: Reflection::NONE,
            window_radius: layout::WINDOW_RADIUS,
            display_ratio: layout::DISPLAY_RATIO,
            tile_aspect: layout::TILE_ASPECT,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_in_range("spread", self.spread, -1.0, 1.0)?;
        ensure_in_range("rotation", self.rotation, 0.0, 1.0)?;
        ensure_in_range("depth", self.depth, 0.0, 1.0)?;
        ensure_in_range("alpha", self.alpha, 0.0, 1.0)?;
        check_window_radius(self.window_radius)?;
        ensure_above("display_ratio", self.display_ratio, 0.0, 2.0)?;
        ensure_above("tile_aspect", self.tile_aspect, 0.0, 100.0)?;
        Ok(())
    }

    /// Pixel mapping for this style in `viewport`.
    pub fn projection(&self, viewport: Viewport) -> Projection {
        Projection::new(viewport, self.display_ratio, self.axis)
    }

    /// Most tiles a single frame can draw: the focused one plus
    /// `window_radius + 1` on each side.
    pub fn max_visible_tiles(&self) -> usize {
        2 * (self.window_radius + 1) + 1
    }

    pub fn set_spread(&mut self, spread: f32) -> Result<(), ConfigError> {
        ensure_in_range("spread", spread, -1.0, 1.0)?;
        self.spread = spread;
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: f32) -> Result<(), ConfigError> {
        ensure_in_range("rotation", rotation, 0.0, 1.0)?;
        self.rotation = rotation;
        Ok(())
    }

    pub fn set_depth(&mut self, depth: f32) -> Result<(), ConfigError> {
        ensure_in_range("depth", depth, 0.0, 1.0)?;
        self.depth = depth;
        Ok(())
    }

    pub fn set_alpha(&mut self, alpha: f32) -> Result<(), ConfigError> {
        ensure_in_range("alpha", alpha, 0.0, 1.0)?;
        self.alpha = alpha;
        Ok(())
    }

    pub fn set_window_radius(&mut self, radius: usize) -> Result<(), ConfigError> {
        check_window_radius(radius)?;
        self.window_radius = radius;
        Ok(())
    }

    pub fn set_display_ratio(&mut self, ratio: f32) -> Result<(), ConfigError> {
        ensure_above("display_ratio", ratio, 0.0, 2.0)?;
        self.display_ratio = ratio;
        Ok(())
    }

    pub fn set_tile_aspect(&mut self, aspect: f32) -> Result<(), ConfigError> {
        ensure_above("tile_aspect", aspect, 0.0, 100.0)?;
        self.tile_aspect = aspect;
        Ok(())
    }
}

fn check_window_radius(radius: usize) -> Result<(), ConfigError> {
    if radius == 0 || radius > 64 {
        return Err(ConfigError::InvalidWindowRadius(radius));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(LayoutConfig::default().validate(), Ok(()));
    }

    #[test]
    fn visible_tile_budget_matches_window() {
        let mut cfg = LayoutConfig::default();
        cfg.set_window_radius(2).unwrap();
        assert_eq!(cfg.max_visible_tiles(), 7);
        assert_eq!(crate::layout::layout(10.0, 40, &cfg).len(), 7);
    }

    #[test]
    fn rejected_setter_keeps_previous_value() {
        let mut cfg = LayoutConfig::default();
        cfg.set_depth(0.8).unwrap();
        assert!(matches!(
            cfg.set_depth(1.5),
            Err(ConfigError::OutOfRange { name: "depth", .. })
        ));
        assert_eq!(cfg.depth, 0.8);
        assert_eq!(
            cfg.set_rotation(f32::INFINITY),
            Err(ConfigError::NonFinite { name: "rotation" })
        );
        assert_eq!(
            cfg.set_window_radius(0),
            Err(ConfigError::InvalidWindowRadius(0))
        );
        assert_eq!(cfg.window_radius, layout::WINDOW_RADIUS);
    }

    #[test]
    fn spread_accepts_full_signed_range() {
        let mut cfg = LayoutConfig::default();
        assert!(cfg.set_spread(-1.0).is_ok());
        assert!(cfg.set_spread(1.0).is_ok());
        assert!(cfg.set_spread(1.01).is_err());
    }
}

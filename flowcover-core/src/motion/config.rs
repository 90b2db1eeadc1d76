//! Configuration for the motion model
//!
//! Speeds are in tiles per second and distances in tiles unless a field name
//! says otherwise, so the same values feel identical at any viewport size.

use std::time::Duration;

use flowcover_model::error::{ensure_above, ensure_in_range};
use flowcover_model::{ConfigError, OverscrollMode};
use serde::{Deserialize, Serialize};

use super::snap::EasingKind;
use crate::constants::{gesture, motion, snap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Fraction of coasting velocity left after one second, in (0, 1).
    pub damping_per_second: f32,
    /// Coasting below this speed hands over to snapping.
    pub min_velocity: f32,
    /// Release speeds are capped to this.
    pub max_velocity: f32,
    /// Duration of the settle onto the nearest tile (ms).
    pub snap_duration_ms: u64,
    /// Duration of an animated programmatic focus change (ms).
    pub jump_duration_ms: u64,
    pub snap_easing: EasingKind,
    /// Pixels a touch may travel and still be a tap.
    pub tap_slop_px: f32,
    /// Longest press still treated as a tap (ms).
    pub tap_max_ms: u64,
    /// Trailing window for the release-velocity estimate (ms).
    pub velocity_window_ms: u64,
    pub velocity_max_samples: usize,
    /// Behaviour past the first/last tile while dragging.
    pub overscroll: OverscrollMode,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            damping_per_second: motion::DAMPING_PER_SECOND,
            min_velocity: motion::MIN_COAST_VELOCITY,
            max_velocity: motion::MAX_VELOCITY,
            snap_duration_ms: snap::DURATION_MS,
            jump_duration_ms: snap::JUMP_DURATION_MS,
            snap_easing: EasingKind::EaseOut,
            tap_slop_px: gesture::TAP_SLOP_PX,
            tap_max_ms: gesture::TAP_MAX_MS,
            velocity_window_ms: motion::VELOCITY_WINDOW_MS,
            velocity_max_samples: motion::VELOCITY_MAX_SAMPLES,
            overscroll: OverscrollMode::default(),
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_above("damping_per_second", self.damping_per_second, 0.0, 1.0)?;
        if self.damping_per_second >= 1.0 {
            return Err(ConfigError::OutOfRange {
                name: "damping_per_second",
                value: f64::from(self.damping_per_second),
                min: 0.0,
                max: 1.0,
            });
        }
        ensure_above("min_velocity", self.min_velocity, 0.0, f32::MAX)?;
        ensure_in_range(
            "max_velocity",
            self.max_velocity,
            self.min_velocity,
            f32::MAX,
        )?;
        ensure_in_range("tap_slop_px", self.tap_slop_px, 0.0, f32::MAX)?;
        if let OverscrollMode::Elastic { resistance } = self.overscroll {
            ensure_above("overscroll.resistance", resistance, 0.0, 1.0)?;
        }
        Ok(())
    }

    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap_duration_ms)
    }

    pub fn jump_duration(&self) -> Duration {
        Duration::from_millis(self.jump_duration_ms)
    }

    pub fn tap_max(&self) -> Duration {
        Duration::from_millis(self.tap_max_ms)
    }

    pub fn velocity_window(&self) -> Duration {
        Duration::from_millis(self.velocity_window_ms)
    }
}

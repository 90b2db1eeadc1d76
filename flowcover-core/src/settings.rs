//! Aggregate widget settings
//!
//! [`FlowCoverSettings`] bundles everything a host may want to persist or
//! ship as a preset. Every field has a default from [`crate::constants`], so
//! partial documents deserialize cleanly.

use std::fmt;

use flowcover_model::{ConfigError, Facing, Reflection};
use serde::{Deserialize, Serialize};

use crate::constants::cache;
use crate::layout::LayoutConfig;
use crate::motion::MotionConfig;

/// Curated layout styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Turned covers on a mirrored floor.
    #[default]
    Classic,
    /// No rotation or depth; a plain strip.
    Flat,
    /// Widely spaced, outward-facing tiles.
    Carousel,
    /// Tightly packed deep stack.
    Stacked,
}

impl Preset {
    pub const ALL: [Self; 4] = [Self::Classic, Self::Flat, Self::Carousel, Self::Stacked];

    /// Apply this preset's style fields to `layout`, leaving axis, window
    /// and sizing untouched.
    pub fn apply(self, layout: &mut LayoutConfig) {
        let (facing, spread, rotation, depth, alpha, reflection) = match self {
            Self::Classic => (Facing::Inward, 0.0, 0.5, 0.3, 0.6, Reflection::BOTTOM),
            Self::Flat => (Facing::Forward, 0.6, 1.0, 0.0, 0.2, Reflection::NONE),
            Self::Carousel => (Facing::Outward, 1.0, 0.7, 0.5, 0.4, Reflection::NONE),
            Self::Stacked => (Facing::Inward, -1.0, 0.2, 0.8, 0.8, Reflection::BOTTOM),
        };
        layout.facing = facing;
        layout.spread = spread;
        layout.rotation = rotation;
        layout.depth = depth;
        layout.alpha = alpha;
        layout.reflection = reflection;
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic => write!(f, "Classic"),
            Self::Flat => write!(f, "Flat"),
            Self::Carousel => write!(f, "Carousel"),
            Self::Stacked => write!(f, "Stacked"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowCoverSettings {
    pub motion: MotionConfig,
    pub layout: LayoutConfig,
    /// Resident resources; must be at least 1.
    pub cache_capacity: i64,
    /// Load tiles on the background worker. When off, a miss loads on the
    /// calling thread.
    pub async_loading: bool,
}

impl Default for FlowCoverSettings {
    fn default() -> Self {
        Self {
            motion: MotionConfig::default(),
            layout: LayoutConfig::default(),
            cache_capacity: cache::CAPACITY,
            async_loading: true,
        }
    }
}

impl FlowCoverSettings {
    pub fn preset(preset: Preset) -> Self {
        let mut settings = Self::default();
        preset.apply(&mut settings.layout);
        settings
    }

    /// Whether the cache can hold every tile one frame draws. When it
    /// cannot, frames evict and reload their own tiles.
    pub fn cache_covers_window(&self) -> bool {
        usize::try_from(self.cache_capacity)
            .is_ok_and(|capacity| capacity >= self.layout.max_visible_tiles())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        self.layout.validate()?;
        if self.cache_capacity < 1 {
            return Err(ConfigError::InvalidCapacity(self.cache_capacity));
        }
        Ok(())
    }
}

//! Flowcover constants
//!
//! Compiled defaults for motion feel, gesture recognition, layout and the
//! resource cache. Tuning should happen here so every widget instance and
//! every settings preset starts from the same values.

/// Kinetic motion after a release.
pub mod motion {
    /// Fraction of velocity still present after one second of coasting.
    /// Equivalent to a decay time constant of roughly 240 ms.
    pub const DAMPING_PER_SECOND: f32 = 0.015;
    /// Below this speed (tiles/s) coasting hands over to snapping.
    pub const MIN_COAST_VELOCITY: f32 = 0.6;
    /// Release speeds are capped at this many tiles per second.
    pub const MAX_VELOCITY: f32 = 40.0;
    /// Trailing window used to estimate the release velocity (ms).
    pub const VELOCITY_WINDOW_MS: u64 = 100;
    /// Maximum number of samples kept in the velocity window.
    pub const VELOCITY_MAX_SAMPLES: usize = 8;
}

/// Snap/tween animation defaults.
pub mod snap {
    /// Upper bound for a snap to the nearest tile (ms).
    pub const DURATION_MS: u64 = 180;
    /// Duration for programmatic jumps across several tiles (ms).
    pub const JUMP_DURATION_MS: u64 = 320;
    /// Offsets within this distance of the target count as settled.
    pub const EPSILON: f32 = 1e-4;
}

/// Touch gesture thresholds.
pub mod gesture {
    /// Movement (px) a touch may make and still count as a tap. Also the
    /// point at which a touch turns into a drag.
    pub const TAP_SLOP_PX: f32 = 8.0;
    /// Longest press (ms) still treated as a tap.
    pub const TAP_MAX_MS: u64 = 260;
}

/// Tile layout defaults.
pub mod layout {
    /// Tiles shown on each side of the focused one.
    pub const WINDOW_RADIUS: usize = 4;
    /// Spread between packed off-center tiles, in [-1, 1].
    pub const SPREAD: f32 = 0.0;
    /// Cosine of the maximum tile rotation, in [0, 1].
    pub const ROTATION: f32 = 0.5;
    /// How far off-center tiles recede, in [0, 1].
    pub const DEPTH: f32 = 0.3;
    /// How much off-center tiles fade, in [0, 1].
    pub const ALPHA: f32 = 0.6;
    /// Fraction of the viewport's shorter side covered by one tile unit.
    pub const DISPLAY_RATIO: f32 = 0.5;
    /// Width / height of a tile.
    pub const TILE_ASPECT: f32 = 1.0;
    /// Lateral distance (tile units) between the focused tile and its
    /// immediate neighbours.
    pub const FLANK_GAP: f32 = 0.9;
    /// Base packing pitch for tiles beyond the first neighbour.
    pub const PACK_PITCH_BASE: f32 = 0.5;
    /// How much `spread` widens or narrows the packing pitch.
    pub const PACK_PITCH_SPREAD: f32 = 0.4;
    /// Depth (tile units) per unit of distance at `depth = 1`.
    pub const DEPTH_STEP: f32 = 1.0;
}

/// Resource cache defaults.
pub mod cache {
    /// Resident resources kept by a widget's cache.
    pub const CAPACITY: i64 = 24;
    /// Name of the background loader thread.
    pub const WORKER_THREAD_NAME: &str = "flowcover-loader";
}

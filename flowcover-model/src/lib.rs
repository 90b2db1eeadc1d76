//! Value types shared across the flowcover crates.
//!
//! Nothing in here owns state or threads: these are the geometry, the
//! per-tile visual record produced by layout, the style enums a host sets
//! on the widget, and the configuration error type.
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod tile;

// Intentionally curated re-exports for downstream consumers.
pub use config::{DEFAULT_ELASTIC_RESISTANCE, Facing, OverscrollMode, Reflection, SwipeAxis};
pub use error::{ConfigError, Result as ConfigResult};
pub use geometry::{Point, Projection, Rect, Vec2, Vec3, Viewport};
pub use tile::{TileVisual, extent_for_aspect};

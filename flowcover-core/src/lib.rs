//! Flowcover core
//!
//! A touch-driven "cover flow" engine: a row of image tiles laid out in
//! perspective around a focused tile, swiped with kinetic scrolling and fed
//! by a bounded cache that loads resources on a background thread.
//!
//! Modules
//! - [`motion`]: the kinetic scroll state machine that owns the focus offset.
//! - [`layout`]: pure per-tile geometry derived from the offset.
//! - [`cache`]: LRU resource store and its background loader.
//! - [`view`]: [`FlowCover`], the controller a host embeds.
//! - [`settings`] and [`constants`]: tunables and their defaults.
//!
//! Notes
//! - Nothing here draws. A host turns each [`Frame`] into draw calls.
//! - The library logs through `log` and never installs a logger.

pub mod cache;
pub mod constants;
pub mod error;
pub mod layout;
pub mod motion;
pub mod settings;
pub mod view;

pub use cache::{CacheListener, ImageCache, LoadEvent, LoadEvents, LruCache};
pub use error::{LoadError, Result};
pub use layout::{LayoutConfig, hit_test, layout, tile_visual};
pub use motion::{MotionConfig, MotionEvent, MotionModel, MotionPhase};
pub use settings::{FlowCoverSettings, Preset};
pub use view::{DrawTile, FlowCover, FlowCoverObserver, Frame, TileSource};

pub use flowcover_model as model;

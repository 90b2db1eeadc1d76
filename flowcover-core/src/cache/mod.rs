//! Tile resource caching
//!
//! [`LruCache`] is the plain bounded store. [`ImageCache`] wraps one behind a
//! lock and feeds it from a single background loader thread through a
//! [`LoaderQueue`], so the render path only ever sees a hit or the
//! placeholder.

mod image_cache;
mod lru;
pub mod queue;

pub use image_cache::{CacheListener, ImageCache, LoadEvent, LoadEvents};
pub use lru::LruCache;
pub use queue::{LoadRequest, LoaderQueue};

use crate::error::LoadError;

/// The host's data source.
///
/// `load_tile` runs on the cache's loader thread while async loading is on,
/// and on the caller's thread otherwise.
pub trait TileSource: Send + Sync + 'static {
    type Resource: Send + Sync + 'static;

    fn tile_count(&self) -> usize;

    fn load_tile(&self, index: usize) -> Result<Self::Resource, LoadError>;
}

/// Optional widget notifications. Every method defaults to a no-op.
///
/// All callbacks run synchronously on the thread that drives the widget,
/// including `resource_loaded`, which is handed over from the loader.
pub trait FlowCoverObserver {
    /// A tap landed on `index`.
    fn tile_selected(&self, _index: usize) {}

    fn focus_changed(&self, _index: usize) {}

    fn rolling_began(&self) {}

    fn rolling_ended(&self) {}

    /// The real resource for `index` is now cached.
    fn resource_loaded(&self, _index: usize) {}
}

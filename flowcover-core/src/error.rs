use thiserror::Error;

/// Failure to materialize a tile resource.
///
/// Load errors never reach the render loop: the cache logs them, drops the
/// request and keeps serving the placeholder until a later `resolve`
/// retries.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Tile index {index} is outside the data source (count {count})")]
    OutOfRange { index: usize, count: usize },
    #[error("Loader panicked: {0}")]
    Panicked(String),
}

/// Result type for resource loading
pub type Result<T> = std::result::Result<T, LoadError>;

use thiserror::Error;

/// Errors produced by configuration constructors and setters.
///
/// These are always reported synchronously to the caller; a setter that
/// returns one of these leaves the previous value untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("cache capacity must be at least 1, got {0}")]
    InvalidCapacity(i64),
    #[error("tile set is empty")]
    EmptyTileSet,
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{name} must be a finite number")]
    NonFinite { name: &'static str },
    #[error("window radius must be at least 1, got {0}")]
    InvalidWindowRadius(usize),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Check that `value` is finite and lies within `[min, max]`.
pub fn ensure_in_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value: f64::from(value),
            min: f64::from(min),
            max: f64::from(max),
        });
    }
    Ok(())
}

/// Like [`ensure_in_range`] but with an open lower bound (`min < value`).
pub fn ensure_above(name: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    ensure_in_range(name, value, min, max)?;
    if value <= min {
        return Err(ConfigError::OutOfRange {
            name,
            value: f64::from(value),
            min: f64::from(min),
            max: f64::from(max),
        });
    }
    Ok(())
}

pub mod config;
pub mod events;
pub mod model;
pub mod snap;
pub mod velocity;

// Re-export primary types for convenience
pub use config::MotionConfig;
pub use events::{MotionEvent, MotionPhase};
pub use model::MotionModel;
pub use snap::{EasingKind, SnapAnimator};
pub use velocity::VelocityTracker;

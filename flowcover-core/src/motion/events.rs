use flowcover_model::Point;

/// Phase of the kinetic scroll state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MotionPhase {
    #[default]
    Idle,
    /// A touch is down. The offset follows it once it moves past the tap slop.
    Dragging,
    /// Released with speed; decaying exponentially.
    Coasting,
    /// Easing onto a whole tile index.
    Snapping,
}

impl MotionPhase {
    pub fn is_moving(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Notifications produced while handling one input or tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionEvent {
    RollingBegan,
    RollingEnded,
    /// The rounded offset settled on a new tile index.
    FocusChanged(usize),
    /// A tap at this widget-local position.
    Tapped(Point),
}

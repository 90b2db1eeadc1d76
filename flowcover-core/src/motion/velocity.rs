use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Release-velocity estimate over a short trailing window of drag samples.
///
/// Velocity is the displacement between the oldest and newest sample still
/// inside the window, divided by their time difference. Using the window
/// rather than the last two samples keeps one jittery move event from
/// dominating the fling.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<(Instant, f32)>,
    window: Duration,
    max_samples: usize,
}

impl VelocityTracker {
    pub fn new(window: Duration, max_samples: usize) -> Self {
        let max_samples = max_samples.max(2);
        Self {
            samples: VecDeque::with_capacity(max_samples),
            window,
            max_samples,
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn push(&mut self, at: Instant, offset: f32) {
        if let Some(&(last, _)) = self.samples.back()
            && at < last
        {
            // out-of-order sample; keep the timeline monotone
            return;
        }
        self.samples.push_back((at, offset));
        while self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }
        self.prune(at);
    }

    /// Offset units per second at `now`; zero without two usable samples.
    pub fn velocity(&self, now: Instant) -> f32 {
        let mut in_window = self
            .samples
            .iter()
            .filter(|(t, _)| now.saturating_duration_since(*t) <= self.window);
        let Some(&(t0, x0)) = in_window.next() else {
            return 0.0;
        };
        let Some(&(t1, x1)) = in_window.last() else {
            return 0.0;
        };
        let dt = t1.saturating_duration_since(t0).as_secs_f32();
        if dt <= f32::EPSILON {
            return 0.0;
        }
        (x1 - x0) / dt
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&(t, _)) = self.samples.front() {
            if now.saturating_duration_since(t) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

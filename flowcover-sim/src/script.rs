//! Scripted gestures on a virtual clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use flowcover_core::model::{Point, SwipeAxis, Vec2};
use flowcover_core::{FlowCover, FlowCoverObserver, Frame, MotionPhase, TileSource};

/// Samples a drag produces between touch down and touch up.
const DRAG_STEPS: u32 = 6;

/// Logs every widget notification and keeps a few counters for the summary.
#[derive(Debug, Default)]
pub struct Reporter {
    pub selections: AtomicUsize,
    pub focus_changes: AtomicUsize,
    pub loads: AtomicUsize,
}

impl FlowCoverObserver for Reporter {
    fn tile_selected(&self, index: usize) {
        self.selections.fetch_add(1, Ordering::Relaxed);
        log::info!("selected tile {index}");
    }

    fn focus_changed(&self, index: usize) {
        self.focus_changes.fetch_add(1, Ordering::Relaxed);
        log::debug!("focus -> {index}");
    }

    fn rolling_began(&self) {
        log::debug!("rolling began");
    }

    fn rolling_ended(&self) {
        log::debug!("rolling ended");
    }

    fn resource_loaded(&self, index: usize) {
        self.loads.fetch_add(1, Ordering::Relaxed);
        log::trace!("loaded tile {index}");
    }
}

/// Drives a widget the way a host's event loop would, but with synthetic
/// timestamps advancing by a fixed frame step.
pub struct Simulation<S: TileSource> {
    cover: FlowCover<S>,
    now: Instant,
    step: Duration,
    frames: usize,
}

impl<S: TileSource> Simulation<S> {
    pub fn new(cover: FlowCover<S>, step: Duration) -> Self {
        Self {
            cover,
            now: Instant::now(),
            step,
            frames: 0,
        }
    }

    pub fn cover(&self) -> &FlowCover<S> {
        &self.cover
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn frame(&mut self) -> Frame<S::Resource> {
        self.now += self.step;
        self.frames += 1;
        self.cover.frame(self.now)
    }

    /// Drag one third of the viewport toward the start of the swipe axis,
    /// which brings later tiles into focus, then release.
    pub fn swipe_forward(&mut self, over: Duration) {
        let viewport = self.cover.viewport();
        let center = viewport.center();
        let axis = self.cover.layout_config().axis;
        let reach = match axis {
            SwipeAxis::Horizontal => Vec2::new(viewport.width / 3.0, 0.0),
            SwipeAxis::Vertical => Vec2::new(0.0, viewport.height / 3.0),
        };
        self.drag(center + reach * 0.5, center - reach * 0.5, over);
    }

    pub fn drag(&mut self, from: Point, to: Point, over: Duration) {
        let interval = over / DRAG_STEPS;
        self.cover.touch_down(from, self.now);
        for step in 1..=DRAG_STEPS {
            self.now += interval;
            let t = step as f32 / DRAG_STEPS as f32;
            self.cover.touch_move(from.lerp(to, t), self.now);
            self.frames += 1;
            self.cover.frame(self.now);
        }
        self.cover.touch_up(to, self.now);
    }

    pub fn tap(&mut self, at: Point) {
        self.cover.touch_down(at, self.now);
        self.now += Duration::from_millis(40);
        self.cover.touch_up(at, self.now);
        self.frame();
    }

    /// Render frames until the row is idle. Returns false if it is still
    /// moving after `max_frames`.
    pub fn settle(&mut self, max_frames: usize) -> bool {
        for _ in 0..max_frames {
            if self.frame().phase == MotionPhase::Idle {
                return true;
            }
        }
        false
    }

    /// Keep rendering, sleeping one step of wall time between frames, until
    /// every drawn tile shows its real resource or `timeout` runs out.
    pub fn wait_for_loads(&mut self, timeout: Duration) -> Frame<S::Resource> {
        let deadline = Instant::now() + timeout;
        loop {
            let frame = self.frame();
            if frame.tiles.iter().all(|tile| tile.loaded) || Instant::now() >= deadline {
                return frame;
            }
            std::thread::sleep(self.step);
        }
    }
}

impl<S: TileSource> std::fmt::Debug for Simulation<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("cover", &self.cover)
            .field("step", &self.step)
            .field("frames", &self.frames)
            .finish()
    }
}

/// Shared handle so the caller can read counters after the run.
pub fn reporter() -> Arc<Reporter> {
    Arc::new(Reporter::default())
}

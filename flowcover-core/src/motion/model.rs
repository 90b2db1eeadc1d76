use std::time::{Duration, Instant};

use flowcover_model::error::ensure_above;
use flowcover_model::{ConfigError, OverscrollMode, Point, Projection, SwipeAxis, Viewport};

use super::config::MotionConfig;
use super::events::{MotionEvent, MotionPhase};
use super::snap::SnapAnimator;
use super::velocity::VelocityTracker;
use crate::constants::{layout, snap::EPSILON};

#[derive(Debug, Clone, Copy)]
struct Touch {
    start_pos: Point,
    start_offset: f32,
    started_at: Instant,
    /// The touch landed while the row was moving; it can never be a tap.
    caught: bool,
    /// Moved past the tap slop at least once.
    dragging: bool,
}

/// Kinetic scroll state machine owning the focus offset.
///
/// Inputs are touch samples and redraw ticks, each stamped with the time it
/// happened; nothing in here reads the clock. Every input appends whatever
/// notifications it caused to a caller-supplied buffer, and reports at most
/// one [`MotionEvent::FocusChanged`] carrying the final index.
#[derive(Debug, Clone)]
pub struct MotionModel {
    cfg: MotionConfig,
    axis: SwipeAxis,
    /// Pixels of drag per unit of offset.
    pitch_px: f32,
    tile_count: usize,
    phase: MotionPhase,
    offset: f32,
    /// Offset units per second while coasting.
    velocity: f32,
    tracker: VelocityTracker,
    snap: SnapAnimator,
    touch: Option<Touch>,
    last_tick: Option<Instant>,
    focused: usize,
    rolling: bool,
}

impl MotionModel {
    pub fn new(cfg: MotionConfig, tile_count: usize) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let axis = SwipeAxis::default();
        let projection = Projection::new(Viewport::default(), layout::DISPLAY_RATIO, axis);
        Ok(Self {
            tracker: VelocityTracker::new(cfg.velocity_window(), cfg.velocity_max_samples),
            cfg,
            axis,
            pitch_px: projection.pitch_px(),
            tile_count,
            phase: MotionPhase::Idle,
            offset: 0.0,
            velocity: 0.0,
            snap: SnapAnimator::new(),
            touch: None,
            last_tick: None,
            focused: 0,
            rolling: false,
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.cfg
    }

    /// Replace the configuration; takes effect on the next input.
    pub fn set_config(&mut self, cfg: MotionConfig) -> Result<(), ConfigError> {
        cfg.validate()?;
        self.tracker = VelocityTracker::new(cfg.velocity_window(), cfg.velocity_max_samples);
        self.cfg = cfg;
        Ok(())
    }

    pub fn axis(&self) -> SwipeAxis {
        self.axis
    }

    pub fn set_axis(&mut self, axis: SwipeAxis) {
        self.axis = axis;
    }

    pub fn pitch_px(&self) -> f32 {
        self.pitch_px
    }

    pub fn set_pitch_px(&mut self, pitch_px: f32) -> Result<(), ConfigError> {
        ensure_above("pitch_px", pitch_px, 0.0, f32::MAX)?;
        self.pitch_px = pitch_px;
        Ok(())
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Current focus offset. Outside `[0, count - 1]` only during an
    /// elastic drag or the snap back from one.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Index of the tile nearest the focus point.
    pub fn focused_index(&self) -> usize {
        self.focused
    }

    /// Between a `RollingBegan` and its `RollingEnded`.
    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    pub fn is_touching(&self) -> bool {
        self.touch.is_some()
    }

    pub fn touch_down(&mut self, pos: Point, at: Instant, events: &mut Vec<MotionEvent>) {
        if !pos.is_finite() {
            return;
        }
        // catch the row where it is now, not where the last tick left it
        self.step(at, events);
        let caught = self.phase.is_moving();
        self.snap.cancel();
        self.velocity = 0.0;
        self.tracker.reset();
        self.tracker.push(at, self.offset);
        self.touch = Some(Touch {
            start_pos: pos,
            start_offset: self.offset,
            started_at: at,
            caught,
            dragging: false,
        });
        self.set_phase(MotionPhase::Dragging);
        self.emit_focus(events);
    }

    pub fn touch_move(&mut self, pos: Point, at: Instant, events: &mut Vec<MotionEvent>) {
        self.drag_to(pos, at, events);
        self.emit_focus(events);
    }

    pub fn touch_up(&mut self, pos: Point, at: Instant, events: &mut Vec<MotionEvent>) {
        self.drag_to(pos, at, events);
        let Some(touch) = self.touch.take() else {
            return;
        };

        if !touch.dragging {
            if touch.caught {
                self.start_snap(at, events);
            } else {
                let held = at.saturating_duration_since(touch.started_at);
                if held <= self.cfg.tap_max() {
                    log::trace!("tap at {:?}", touch.start_pos);
                    events.push(MotionEvent::Tapped(touch.start_pos));
                }
                self.set_phase(MotionPhase::Idle);
            }
            self.emit_focus(events);
            return;
        }

        let max_v = self.cfg.max_velocity;
        let velocity = self.tracker.velocity(at).clamp(-max_v, max_v);
        self.tracker.reset();
        if self.offset < 0.0 || self.offset > self.max_offset() {
            self.start_snap(at, events);
        } else if velocity.abs() > self.cfg.min_velocity {
            self.begin_coast(velocity, at);
        } else {
            self.start_snap(at, events);
        }
        self.emit_focus(events);
    }

    /// Advance coasting or snapping to `now`.
    pub fn tick(&mut self, now: Instant, events: &mut Vec<MotionEvent>) {
        self.step(now, events);
        self.emit_focus(events);
    }

    /// Time of the most recent tick or release, if any.
    pub fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }

    /// Start coasting at `velocity` tiles per second, as if a drag had just
    /// been released at that speed.
    pub fn fling(&mut self, velocity: f32, at: Instant, events: &mut Vec<MotionEvent>) {
        if !velocity.is_finite() {
            return;
        }
        self.touch = None;
        self.snap.cancel();
        let max_v = self.cfg.max_velocity;
        let velocity = velocity.clamp(-max_v, max_v);
        if velocity.abs() > self.cfg.min_velocity {
            self.begin_rolling(events);
            self.begin_coast(velocity, at);
        } else {
            self.start_snap(at, events);
        }
        self.emit_focus(events);
    }

    /// Move focus to `index`, clamped to the last tile.
    ///
    /// When `animated`, the offset eases there over the jump duration and
    /// the usual rolling notifications fire; otherwise it lands at once.
    pub fn set_focused_index(
        &mut self,
        index: usize,
        animated: bool,
        at: Instant,
        events: &mut Vec<MotionEvent>,
    ) -> Result<(), ConfigError> {
        if self.tile_count == 0 {
            return Err(ConfigError::EmptyTileSet);
        }
        let target = index.min(self.tile_count - 1) as f32;
        self.touch = None;
        self.tracker.reset();
        self.velocity = 0.0;
        if animated && (self.offset - target).abs() > EPSILON {
            self.begin_rolling(events);
            self.snap.start(
                self.offset,
                target,
                at,
                self.cfg.jump_duration(),
                self.cfg.snap_easing,
            );
            self.set_phase(MotionPhase::Snapping);
        } else {
            self.snap.cancel();
            self.offset = target;
            self.finish(events);
        }
        self.emit_focus(events);
        Ok(())
    }

    /// React to the data source changing size.
    pub fn set_tile_count(
        &mut self,
        tile_count: usize,
        at: Instant,
        events: &mut Vec<MotionEvent>,
    ) {
        self.tile_count = tile_count;
        if tile_count == 0 {
            self.touch = None;
            self.snap.cancel();
            self.offset = 0.0;
            self.focused = 0;
            self.finish(events);
            return;
        }
        let max = self.max_offset();
        match self.phase {
            MotionPhase::Idle => self.offset = self.offset.clamp(0.0, max),
            MotionPhase::Snapping if self.snap.target() > max => {
                self.start_snap(at, events)
            }
            // coasting hits the new bound on its next tick; drags re-clamp on
            // the next move
            _ => {}
        }
        self.emit_focus(events);
    }

    fn max_offset(&self) -> f32 {
        self.tile_count.saturating_sub(1) as f32
    }

    fn step(&mut self, now: Instant, events: &mut Vec<MotionEvent>) {
        let last = self.last_tick.replace(now).unwrap_or(now);
        let dt = now.saturating_duration_since(last);
        match self.phase {
            MotionPhase::Coasting => self.coast(dt, now, events),
            MotionPhase::Snapping => self.settle(now, events),
            MotionPhase::Idle | MotionPhase::Dragging => {}
        }
    }

    fn drag_to(&mut self, pos: Point, at: Instant, events: &mut Vec<MotionEvent>) {
        let Some(mut touch) = self.touch else {
            return;
        };
        if !pos.is_finite() {
            return;
        }
        if !touch.dragging {
            if pos.distance(touch.start_pos) <= self.cfg.tap_slop_px {
                return;
            }
            touch.dragging = true;
            self.touch = Some(touch);
            self.begin_rolling(events);
        }
        // content follows the finger: dragging toward +axis reveals lower
        // indices
        let delta = self.axis.project(pos - touch.start_pos);
        let raw = touch.start_offset - delta / self.pitch_px;
        self.offset = self.overscroll(raw);
        self.tracker.push(at, self.offset);
    }

    fn overscroll(&self, raw: f32) -> f32 {
        let max = self.max_offset();
        match self.cfg.overscroll {
            OverscrollMode::Clamp => raw.clamp(0.0, max),
            OverscrollMode::Elastic { resistance } => {
                if raw < 0.0 {
                    raw * resistance
                } else if raw > max {
                    max + (raw - max) * resistance
                } else {
                    raw
                }
            }
        }
    }

    fn begin_coast(&mut self, velocity: f32, at: Instant) {
        self.velocity = velocity;
        self.last_tick = Some(at);
        self.set_phase(MotionPhase::Coasting);
    }

    /// Exponential decay integrated exactly over `dt`, so the distance
    /// covered does not depend on how the interval is sliced into ticks.
    fn coast(&mut self, dt: Duration, now: Instant, events: &mut Vec<MotionEvent>) {
        if dt.is_zero() {
            return;
        }
        let t = dt.as_secs_f32();
        let damping = self.cfg.damping_per_second;
        let decay = damping.powf(t);
        let travelled = self.velocity * (decay - 1.0) / damping.ln();
        self.velocity *= decay;

        let next = self.offset + travelled;
        let max = self.max_offset();
        if next < 0.0 || next > max {
            self.offset = next.clamp(0.0, max);
            self.velocity = 0.0;
            self.start_snap(now, events);
            return;
        }
        self.offset = next;
        if self.velocity.abs() < self.cfg.min_velocity {
            self.velocity = 0.0;
            self.start_snap(now, events);
        }
    }

    fn start_snap(&mut self, at: Instant, events: &mut Vec<MotionEvent>) {
        let target = self.offset.round().clamp(0.0, self.max_offset());
        self.velocity = 0.0;
        if (self.offset - target).abs() <= EPSILON {
            self.offset = target;
            self.snap.cancel();
            self.finish(events);
            return;
        }
        self.begin_rolling(events);
        self.snap.start(
            self.offset,
            target,
            at,
            self.cfg.snap_duration(),
            self.cfg.snap_easing,
        );
        self.set_phase(MotionPhase::Snapping);
    }

    fn settle(&mut self, now: Instant, events: &mut Vec<MotionEvent>) {
        match self.snap.sample(now) {
            Some(offset) => {
                self.offset = offset;
                if !self.snap.is_active() {
                    self.finish(events);
                }
            }
            None => self.finish(events),
        }
    }

    fn finish(&mut self, events: &mut Vec<MotionEvent>) {
        self.velocity = 0.0;
        self.set_phase(MotionPhase::Idle);
        if self.rolling {
            self.rolling = false;
            events.push(MotionEvent::RollingEnded);
        }
    }

    fn begin_rolling(&mut self, events: &mut Vec<MotionEvent>) {
        if !self.rolling {
            self.rolling = true;
            events.push(MotionEvent::RollingBegan);
        }
    }

    fn set_phase(&mut self, phase: MotionPhase) {
        if self.phase != phase {
            log::trace!(
                "motion {:?} -> {:?} at offset {:.3}",
                self.phase,
                phase,
                self.offset
            );
            self.phase = phase;
        }
    }

    fn emit_focus(&mut self, events: &mut Vec<MotionEvent>) {
        if self.tile_count == 0 {
            return;
        }
        let index = self.offset.round().clamp(0.0, self.max_offset()) as usize;
        if index != self.focused {
            self.focused = index;
            events.push(MotionEvent::FocusChanged(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn model(count: usize) -> MotionModel {
        let mut m = MotionModel::new(MotionConfig::default(), count).unwrap();
        m.set_pitch_px(100.0).unwrap();
        m
    }

    fn run_to_idle(
        m: &mut MotionModel,
        mut now: Instant,
        events: &mut Vec<MotionEvent>,
    ) -> Instant {
        for _ in 0..2_000 {
            if m.phase() == MotionPhase::Idle {
                break;
            }
            now += FRAME;
            m.tick(now, events);
        }
        now
    }

    fn count(events: &[MotionEvent], wanted: MotionEvent) -> usize {
        events.iter().filter(|e| **e == wanted).count()
    }

    #[test]
    fn tap_reports_position_without_rolling() {
        let mut m = model(5);
        let t0 = Instant::now();
        let mut events = Vec::new();
        let at = Point::new(40.0, 60.0);
        m.touch_down(at, t0, &mut events);
        m.touch_up(at, t0 + Duration::from_millis(80), &mut events);
        assert_eq!(events, vec![MotionEvent::Tapped(at)]);
        assert_eq!(m.phase(), MotionPhase::Idle);
    }

    #[test]
    fn slow_press_is_not_a_tap() {
        let mut m = model(5);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.touch_down(Point::ZERO, t0, &mut events);
        m.touch_up(Point::ZERO, t0 + Duration::from_millis(900), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn movement_within_slop_does_not_drag() {
        let mut m = model(5);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.touch_down(Point::new(100.0, 0.0), t0, &mut events);
        m.touch_move(Point::new(95.0, 0.0), t0 + FRAME, &mut events);
        assert_eq!(m.offset(), 0.0);
        assert!(!m.is_rolling());
    }

    #[test]
    fn drag_follows_finger_in_tile_units() {
        let mut m = model(5);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.touch_down(Point::new(300.0, 0.0), t0, &mut events);
        m.touch_move(Point::new(150.0, 0.0), t0 + FRAME, &mut events);
        assert!((m.offset() - 1.5).abs() < 1e-5);
        assert_eq!(
            events,
            vec![MotionEvent::RollingBegan, MotionEvent::FocusChanged(2)]
        );
    }

    #[test]
    fn slow_release_snaps_to_nearest_and_ends_once() {
        let mut m = model(5);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.touch_down(Point::new(300.0, 0.0), t0, &mut events);
        m.touch_move(Point::new(170.0, 0.0), t0 + FRAME, &mut events);
        let up = t0 + Duration::from_millis(400);
        m.touch_move(Point::new(170.0, 0.0), up, &mut events);
        m.touch_up(Point::new(170.0, 0.0), up, &mut events);
        assert_eq!(m.phase(), MotionPhase::Snapping);

        run_to_idle(&mut m, up, &mut events);
        assert_eq!(m.offset(), 1.0);
        assert_eq!(m.focused_index(), 1);
        assert_eq!(count(&events, MotionEvent::RollingBegan), 1);
        assert_eq!(count(&events, MotionEvent::RollingEnded), 1);
        assert_eq!(events.last(), Some(&MotionEvent::RollingEnded));
    }

    #[test]
    fn fast_release_coasts_then_settles_on_whole_tile() {
        let mut m = model(50);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.touch_down(Point::new(400.0, 0.0), t0, &mut events);
        for i in 1..=6u32 {
            let x = 400.0 - 40.0 * i as f32;
            m.touch_move(Point::new(x, 0.0), t0 + FRAME * i, &mut events);
        }
        let up = t0 + FRAME * 6;
        m.touch_up(Point::new(160.0, 0.0), up, &mut events);
        assert_eq!(m.phase(), MotionPhase::Coasting);
        assert!(m.velocity() > 0.0);

        let released_at = m.offset();
        run_to_idle(&mut m, up, &mut events);
        assert!(m.offset() > released_at);
        assert_eq!(m.offset(), m.offset().round());
        assert_eq!(count(&events, MotionEvent::RollingBegan), 1);
        assert_eq!(count(&events, MotionEvent::RollingEnded), 1);
    }

    #[test]
    fn coasting_stops_at_last_tile() {
        let mut m = model(3);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.fling(30.0, t0, &mut events);
        run_to_idle(&mut m, t0, &mut events);
        assert_eq!(m.offset(), 2.0);
        assert_eq!(m.focused_index(), 2);
    }

    #[test]
    fn elastic_overscroll_resists_and_springs_back() {
        let mut m = model(3);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.touch_down(Point::new(0.0, 0.0), t0, &mut events);
        // 2 tiles before the first one
        m.touch_move(Point::new(200.0, 0.0), t0 + FRAME, &mut events);
        assert!((m.offset() + 0.7).abs() < 1e-5);
        let up = t0 + Duration::from_millis(500);
        m.touch_up(Point::new(200.0, 0.0), up, &mut events);
        assert_eq!(m.phase(), MotionPhase::Snapping);
        run_to_idle(&mut m, up, &mut events);
        assert_eq!(m.offset(), 0.0);
    }

    #[test]
    fn clamp_overscroll_holds_at_bound() {
        let cfg = MotionConfig {
            overscroll: OverscrollMode::Clamp,
            ..Default::default()
        };
        let mut m = MotionModel::new(cfg, 3).unwrap();
        m.set_pitch_px(100.0).unwrap();
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.touch_down(Point::ZERO, t0, &mut events);
        m.touch_move(Point::new(-900.0, 0.0), t0 + FRAME, &mut events);
        assert_eq!(m.offset(), 2.0);
    }

    #[test]
    fn touch_during_coast_catches_without_teleport() {
        let mut m = model(50);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.fling(10.0, t0, &mut events);
        let later = t0 + Duration::from_millis(100);
        m.tick(later, &mut events);
        let before = m.offset();

        m.touch_down(Point::ZERO, later, &mut events);
        assert_eq!(m.phase(), MotionPhase::Dragging);
        assert_eq!(m.offset(), before);
        assert!(m.is_rolling());

        // releasing a caught row is not a tap
        m.touch_up(Point::ZERO, later + FRAME, &mut events);
        assert!(!events.iter().any(|e| matches!(e, MotionEvent::Tapped(_))));
        run_to_idle(&mut m, later + FRAME, &mut events);
        assert_eq!(count(&events, MotionEvent::RollingBegan), 1);
        assert_eq!(count(&events, MotionEvent::RollingEnded), 1);
    }

    #[test]
    fn touch_during_snap_catches_without_teleport() {
        let mut m = model(10);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.set_focused_index(6, true, t0, &mut events).unwrap();
        let later = t0 + Duration::from_millis(100);
        m.tick(later, &mut events);
        assert_eq!(m.phase(), MotionPhase::Snapping);
        let before = m.offset();
        assert!(before > 0.0 && before < 6.0);

        m.touch_down(Point::ZERO, later, &mut events);
        assert_eq!(m.phase(), MotionPhase::Dragging);
        assert_eq!(m.offset(), before);

        m.touch_up(Point::ZERO, later + FRAME, &mut events);
        assert!(!events.iter().any(|e| matches!(e, MotionEvent::Tapped(_))));
        run_to_idle(&mut m, later + FRAME, &mut events);
        assert_eq!(m.offset(), before.round());
        assert_eq!(count(&events, MotionEvent::RollingBegan), 1);
        assert_eq!(count(&events, MotionEvent::RollingEnded), 1);
    }

    #[test]
    fn focus_changed_once_per_tick_with_final_index() {
        let mut m = model(50);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.fling(40.0, t0, &mut events);
        events.clear();
        // one long tick crosses many tiles
        m.tick(t0 + Duration::from_millis(200), &mut events);
        let changes: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, MotionEvent::FocusChanged(_)))
            .collect();
        assert_eq!(changes.len(), 1);
        assert_eq!(*changes[0], MotionEvent::FocusChanged(m.focused_index()));
        assert!(m.focused_index() > 1);
    }

    #[test]
    fn coast_distance_is_independent_of_tick_rate() {
        let t0 = Instant::now();
        let mut coarse = model(1000);
        let mut fine = model(1000);
        let mut events = Vec::new();
        coarse.fling(8.0, t0, &mut events);
        fine.fling(8.0, t0, &mut events);

        coarse.tick(t0 + Duration::from_millis(90), &mut events);
        for ms in (10..=90).step_by(10) {
            fine.tick(t0 + Duration::from_millis(ms), &mut events);
        }
        assert!((coarse.offset() - fine.offset()).abs() < 1e-3);
    }

    #[test]
    fn programmatic_focus_jump() {
        let mut m = model(10);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.set_focused_index(4, false, t0, &mut events).unwrap();
        assert_eq!(m.offset(), 4.0);
        assert_eq!(events, vec![MotionEvent::FocusChanged(4)]);

        events.clear();
        m.set_focused_index(99, true, t0, &mut events).unwrap();
        assert_eq!(events, vec![MotionEvent::RollingBegan]);
        run_to_idle(&mut m, t0, &mut events);
        assert_eq!(m.offset(), 9.0);
        assert_eq!(events.last(), Some(&MotionEvent::RollingEnded));

        let mut empty = model(0);
        assert_eq!(
            empty.set_focused_index(0, false, t0, &mut events),
            Err(ConfigError::EmptyTileSet)
        );
    }

    #[test]
    fn shrinking_tile_count_reclamps() {
        let mut m = model(10);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.set_focused_index(8, false, t0, &mut events).unwrap();
        events.clear();
        m.set_tile_count(4, t0, &mut events);
        assert_eq!(m.offset(), 3.0);
        assert_eq!(events, vec![MotionEvent::FocusChanged(3)]);
    }
}

use std::time::{Duration, Instant};

use flowcover_core::model::Point;
use flowcover_core::{MotionConfig, MotionEvent, MotionModel, MotionPhase};
use proptest::prelude::*;

fn model(count: usize, cfg: MotionConfig) -> MotionModel {
    let mut m = MotionModel::new(cfg, count).unwrap();
    m.set_pitch_px(120.0).unwrap();
    m
}

#[test]
fn quick_tap_selects_without_rolling() {
    let mut m = model(5, MotionConfig::default());
    let t0 = Instant::now();
    let mut events = Vec::new();
    let p = Point::new(160.0, 240.0);
    m.touch_down(p, t0, &mut events);
    m.touch_up(p, t0 + Duration::from_millis(60), &mut events);

    let taps = events
        .iter()
        .filter(|e| matches!(e, MotionEvent::Tapped(_)))
        .count();
    assert_eq!(taps, 1);
    assert!(!events.contains(&MotionEvent::RollingBegan));
    assert!(!events.contains(&MotionEvent::RollingEnded));
}

#[test]
fn rolling_notifications_pair_up_across_a_swipe() {
    let mut m = model(20, MotionConfig::default());
    let t0 = Instant::now();
    let mut events = Vec::new();
    m.touch_down(Point::new(300.0, 10.0), t0, &mut events);
    for i in 1..=5u32 {
        let x = 300.0 - 30.0 * i as f32;
        let at = t0 + Duration::from_millis(12 * u64::from(i));
        m.touch_move(Point::new(x, 12.0), at, &mut events);
    }
    let up = t0 + Duration::from_millis(60);
    m.touch_up(Point::new(150.0, 12.0), up, &mut events);

    let mut now = up;
    for _ in 0..1_000 {
        if m.phase() == MotionPhase::Idle {
            break;
        }
        now += Duration::from_millis(16);
        m.tick(now, &mut events);
    }
    assert_eq!(m.phase(), MotionPhase::Idle);
    let began = events.iter().filter(|e| **e == MotionEvent::RollingBegan).count();
    let ended = events.iter().filter(|e| **e == MotionEvent::RollingEnded).count();
    assert_eq!((began, ended), (1, 1));
    assert_eq!(m.offset().fract(), 0.0);
    assert!(m.offset() >= 0.0 && m.offset() <= 19.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// From any release speed, coasting slows monotonically and the model
    /// comes to rest on a whole tile within a bounded number of ticks.
    #[test]
    fn coasting_terminates(
        velocity in -40.0f32..40.0,
        damping in 0.01f32..0.95,
        dt_ms in 1u64..80,
    ) {
        let cfg = MotionConfig {
            damping_per_second: damping,
            ..Default::default()
        };
        let mut m = model(200, cfg);
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.set_focused_index(100, false, t0, &mut events).unwrap();
        m.fling(velocity, t0, &mut events);

        let mut now = t0;
        let mut last_speed = m.velocity().abs();
        let mut ticks = 0u32;
        while m.phase() != MotionPhase::Idle {
            now += Duration::from_millis(dt_ms);
            m.tick(now, &mut events);
            if m.phase() == MotionPhase::Coasting {
                let speed = m.velocity().abs();
                prop_assert!(speed < last_speed);
                last_speed = speed;
            }
            ticks += 1;
            prop_assert!(ticks < 200_000, "did not settle");
        }
        prop_assert_eq!(m.offset().fract(), 0.0);
        prop_assert!(!m.is_rolling());
    }

    /// Only the final index of a tick is reported, however far it moves.
    #[test]
    fn at_most_one_focus_change_per_tick(velocity in 5.0f32..40.0, dt_ms in 1u64..500) {
        let mut m = model(500, MotionConfig::default());
        let t0 = Instant::now();
        let mut events = Vec::new();
        m.fling(velocity, t0, &mut events);
        events.clear();
        m.tick(t0 + Duration::from_millis(dt_ms), &mut events);
        let changes: Vec<&MotionEvent> = events
            .iter()
            .filter(|e| matches!(e, MotionEvent::FocusChanged(_)))
            .collect();
        prop_assert!(changes.len() <= 1);
        if let Some(MotionEvent::FocusChanged(index)) = changes.first() {
            prop_assert_eq!(*index, m.focused_index());
        }
    }
}

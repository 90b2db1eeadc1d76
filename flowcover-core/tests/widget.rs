use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use flowcover_core::model::{ConfigError, Point, Viewport};
use flowcover_core::{
    FlowCover, FlowCoverObserver, FlowCoverSettings, LoadError, MotionPhase,
    TileSource,
};
use parking_lot::Mutex;

#[derive(Debug)]
struct Covers {
    count: AtomicUsize,
    loads: AtomicUsize,
    broken: Option<usize>,
}

impl Covers {
    fn new(count: usize) -> Self {
        Self {
            count: AtomicUsize::new(count),
            loads: AtomicUsize::new(0),
            broken: None,
        }
    }
}

impl TileSource for Covers {
    type Resource = String;

    fn tile_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn load_tile(&self, index: usize) -> Result<String, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if Some(index) == self.broken {
            return Err(LoadError::Decode(format!("cover {index} is corrupt")));
        }
        Ok(format!("cover-{index}"))
    }
}

#[derive(Debug, PartialEq)]
enum Seen {
    Selected(usize),
    Focus(usize),
    Began,
    Ended,
    Loaded(usize),
}

#[derive(Default)]
struct Recorder(Mutex<Vec<Seen>>);

impl Recorder {
    fn take(&self) -> Vec<Seen> {
        std::mem::take(&mut *self.0.lock())
    }
}

impl FlowCoverObserver for Recorder {
    fn tile_selected(&self, index: usize) {
        self.0.lock().push(Seen::Selected(index));
    }
    fn focus_changed(&self, index: usize) {
        self.0.lock().push(Seen::Focus(index));
    }
    fn rolling_began(&self) {
        self.0.lock().push(Seen::Began);
    }
    fn rolling_ended(&self) {
        self.0.lock().push(Seen::Ended);
    }
    fn resource_loaded(&self, index: usize) {
        self.0.lock().push(Seen::Loaded(index));
    }
}

fn sync_settings() -> FlowCoverSettings {
    FlowCoverSettings {
        async_loading: false,
        ..Default::default()
    }
}

fn widget(count: usize, settings: FlowCoverSettings) -> (FlowCover<Covers>, Arc<Recorder>) {
    let mut cover =
        FlowCover::new(Covers::new(count), String::from("placeholder"), settings).unwrap();
    cover.set_viewport(Viewport::new(400.0, 400.0));
    let recorder = Arc::new(Recorder::default());
    cover.add_observer(recorder.clone());
    (cover, recorder)
}

#[test]
fn empty_source_is_rejected() {
    let err =
        FlowCover::new(Covers::new(0), String::new(), FlowCoverSettings::default()).unwrap_err();
    assert_eq!(err, ConfigError::EmptyTileSet);
}

#[test]
fn tap_on_neighbour_selects_it() {
    let (mut cover, seen) = widget(5, sync_settings());
    let t0 = Instant::now();
    cover.set_focused_index(2, false, t0).unwrap();
    seen.take();

    // right neighbour sits 0.9 tile units (200 px each) right of centre
    let p = Point::new(380.0, 200.0);
    cover.touch_down(p, t0);
    cover.touch_up(p, t0 + Duration::from_millis(50));
    assert_eq!(seen.take(), vec![Seen::Selected(3)]);
    assert_eq!(cover.focused_index(), 2);
}

#[test]
fn tap_on_empty_space_selects_nothing() {
    let (mut cover, seen) = widget(5, sync_settings());
    let t0 = Instant::now();
    let p = Point::new(5.0, 5.0);
    cover.touch_down(p, t0);
    cover.touch_up(p, t0 + Duration::from_millis(50));
    assert!(seen.take().is_empty());
}

#[test]
fn swipe_reports_rolling_and_focus() {
    let (mut cover, seen) = widget(10, sync_settings());
    let t0 = Instant::now();
    cover.touch_down(Point::new(300.0, 200.0), t0);
    cover.touch_move(Point::new(200.0, 200.0), t0 + Duration::from_millis(16));
    cover.touch_move(Point::new(100.0, 200.0), t0 + Duration::from_millis(300));
    let up = t0 + Duration::from_millis(500);
    cover.touch_up(Point::new(100.0, 200.0), up);

    let mut now = up;
    while cover.phase() != MotionPhase::Idle {
        now += Duration::from_millis(16);
        cover.frame(now);
        assert!(now < up + Duration::from_secs(5));
    }
    // 200 px at 200 px per tile
    assert_eq!(cover.focused_index(), 1);
    assert_eq!(seen.take(), vec![Seen::Began, Seen::Focus(1), Seen::Ended]);
}

#[test]
fn frame_draws_window_back_to_front_with_loaded_resources() {
    let (mut cover, _) = widget(20, sync_settings());
    let t0 = Instant::now();
    cover.set_focused_index(10, false, t0).unwrap();
    let frame = cover.frame(t0);

    assert_eq!(frame.focused, 10);
    // default radius 4, plus one fading tile on each side
    assert_eq!(frame.tiles.len(), 2 * 4 + 3);
    assert_eq!(frame.tiles.last().map(|t| t.visual.index), Some(10));
    assert!(frame.tiles.iter().all(|t| t.loaded));
    let focused = frame.tiles.last().unwrap();
    assert_eq!(focused.resource.as_str(), "cover-10");
    assert_eq!(focused.rect.center(), Point::new(200.0, 200.0));
}

#[test]
fn sync_mode_failure_falls_back_to_placeholder() {
    let mut source = Covers::new(3);
    source.broken = Some(1);
    let mut cover = FlowCover::new(source, String::from("placeholder"), sync_settings()).unwrap();
    let frame = cover.frame(Instant::now());
    let broken = frame.tiles.iter().find(|t| t.visual.index == 1).unwrap();
    assert!(!broken.loaded);
    assert_eq!(broken.resource.as_str(), "placeholder");
}

#[test]
fn async_frames_pick_up_loads_on_later_ticks() {
    let (mut cover, seen) = widget(3, FlowCoverSettings::default());
    let t0 = Instant::now();
    let first = cover.frame(t0);
    assert!(first.tiles.iter().all(|t| !t.loaded));
    assert!(first.tiles.iter().all(|t| t.resource.as_str() == "placeholder"));

    // a Loaded notification is posted only after the resource is cached
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut now = t0;
    let mut loaded = Vec::new();
    while loaded.len() < 3 {
        assert!(Instant::now() < deadline, "loads never arrived");
        std::thread::sleep(Duration::from_millis(5));
        now += Duration::from_millis(16);
        cover.frame(now);
        loaded.extend(seen.take().into_iter().filter_map(|s| match s {
            Seen::Loaded(i) => Some(i),
            _ => None,
        }));
    }
    let frame = cover.frame(now);
    assert!(frame.tiles.iter().all(|t| t.loaded));
    assert_eq!(cover.source().loads.load(Ordering::SeqCst), 3);
    loaded.sort_unstable();
    assert_eq!(loaded, vec![0, 1, 2]);
}

#[test]
fn invalidate_forces_reload() {
    let (mut cover, _) = widget(3, sync_settings());
    let t0 = Instant::now();
    cover.frame(t0);
    assert_eq!(cover.source().loads.load(Ordering::SeqCst), 3);
    cover.invalidate(1);
    cover.frame(t0);
    assert_eq!(cover.source().loads.load(Ordering::SeqCst), 4);
    cover.invalidate_all();
    assert!(cover.cache().is_empty());
    cover.frame(t0);
    assert_eq!(cover.source().loads.load(Ordering::SeqCst), 7);
}

#[test]
fn reload_data_follows_shrinking_source() {
    let (mut cover, seen) = widget(10, sync_settings());
    let t0 = Instant::now();
    cover.set_focused_index(9, false, t0).unwrap();
    seen.take();
    cover.source().count.store(4, Ordering::SeqCst);
    cover.reload_data(t0);
    assert_eq!(cover.tile_count(), 4);
    assert_eq!(cover.focused_index(), 3);
    assert_eq!(seen.take(), vec![Seen::Focus(3)]);
    let frame = cover.frame(t0);
    assert!(frame.tiles.iter().all(|t| t.visual.index < 4));
}

#[test]
fn setters_validate_and_keep_old_values() {
    let (mut cover, _) = widget(3, sync_settings());
    assert!(cover.set_alpha(2.0).is_err());
    assert_eq!(cover.layout_config().alpha, FlowCoverSettings::default().layout.alpha);
    cover.set_alpha(0.1).unwrap();
    assert_eq!(cover.layout_config().alpha, 0.1);
    assert!(cover.set_window_radius(0).is_err());
}

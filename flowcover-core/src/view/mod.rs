//! The cover-flow widget controller
//!
//! [`FlowCover`] is what a host embeds. It lives entirely in the host's
//! redraw/input domain: touch events and ticks go in, [`Frame`]s come out,
//! and observer callbacks fire synchronously from those calls. The only
//! other thread involved is the cache's loader, whose completions are
//! drained at the start of each frame.

mod source;

pub use source::{FlowCoverObserver, TileSource};

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use flowcover_model::{
    ConfigError, Facing, Point, Rect, Reflection, SwipeAxis, TileVisual,
    Viewport,
};

use crate::cache::{ImageCache, LoadEvent, LoadEvents};
use crate::layout::{self, LayoutConfig};
use crate::motion::{MotionConfig, MotionEvent, MotionModel, MotionPhase};
use crate::settings::{FlowCoverSettings, Preset};

/// One tile ready to draw.
#[derive(Debug, Clone)]
pub struct DrawTile<R> {
    pub visual: TileVisual,
    /// Footprint in widget-local pixels.
    pub rect: Rect,
    pub resource: Arc<R>,
    /// False while `resource` is the placeholder.
    pub loaded: bool,
}

/// Everything drawn for one redraw tick.
#[derive(Debug, Clone)]
pub struct Frame<R> {
    /// Back to front.
    pub tiles: Vec<DrawTile<R>>,
    pub focused: usize,
    pub offset: f32,
    pub phase: MotionPhase,
}

pub struct FlowCover<S: TileSource> {
    source: Arc<S>,
    tile_count: usize,
    motion: MotionModel,
    layout: LayoutConfig,
    viewport: Viewport,
    cache: ImageCache<usize, S::Resource>,
    loads: LoadEvents<usize, S::Resource>,
    placeholder: Arc<S::Resource>,
    observers: Vec<Arc<dyn FlowCoverObserver>>,
    async_loading: bool,
    // scratch buffer reused across inputs
    events: Vec<MotionEvent>,
}

impl<S: TileSource> FlowCover<S> {
    /// Build a widget over `source`.
    ///
    /// Fails if the settings are invalid or the source has no tiles.
    pub fn new(
        source: S,
        placeholder: S::Resource,
        settings: FlowCoverSettings,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        if !settings.cache_covers_window() {
            log::warn!(
                "cache capacity {} is below the {} tiles a frame can draw",
                settings.cache_capacity,
                settings.layout.max_visible_tiles()
            );
        }
        let tile_count = source.tile_count();
        if tile_count == 0 {
            return Err(ConfigError::EmptyTileSet);
        }
        let cache = ImageCache::new(settings.cache_capacity)?;
        let loads = cache.subscribe();
        let motion = MotionModel::new(settings.motion, tile_count)?;
        let mut cover = Self {
            source: Arc::new(source),
            tile_count,
            motion,
            layout: settings.layout,
            viewport: Viewport::default(),
            cache,
            loads,
            placeholder: Arc::new(placeholder),
            observers: Vec::new(),
            async_loading: settings.async_loading,
            events: Vec::new(),
        };
        cover.motion.set_axis(cover.layout.axis);
        cover.sync_pitch();
        log::debug!(
            "flow cover created with {tile_count} tiles, cache capacity {}",
            settings.cache_capacity
        );
        Ok(cover)
    }

    pub fn add_observer(&mut self, observer: Arc<dyn FlowCoverObserver>) {
        self.observers.push(observer);
    }

    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &ImageCache<usize, S::Resource> {
        &self.cache
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn motion(&self) -> &MotionModel {
        &self.motion
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn offset(&self) -> f32 {
        self.motion.offset()
    }

    pub fn focused_index(&self) -> usize {
        self.motion.focused_index()
    }

    pub fn phase(&self) -> MotionPhase {
        self.motion.phase()
    }

    // ========== INPUT ==========

    pub fn touch_down(&mut self, pos: Point, at: Instant) {
        let mut events = std::mem::take(&mut self.events);
        self.motion.touch_down(pos, at, &mut events);
        self.dispatch(&mut events);
        self.events = events;
    }

    pub fn touch_move(&mut self, pos: Point, at: Instant) {
        let mut events = std::mem::take(&mut self.events);
        self.motion.touch_move(pos, at, &mut events);
        self.dispatch(&mut events);
        self.events = events;
    }

    pub fn touch_up(&mut self, pos: Point, at: Instant) {
        let mut events = std::mem::take(&mut self.events);
        self.motion.touch_up(pos, at, &mut events);
        self.dispatch(&mut events);
        self.events = events;
    }

    /// Advance motion to `now`, deliver finished loads and lay out the
    /// visible tiles.
    pub fn frame(&mut self, now: Instant) -> Frame<S::Resource> {
        let mut events = std::mem::take(&mut self.events);
        self.motion.tick(now, &mut events);
        self.dispatch(&mut events);
        self.events = events;
        self.deliver_loads();

        let offset = self.motion.offset();
        let visuals = layout::layout(offset, self.tile_count, &self.layout);
        let projection = self.layout.projection(self.viewport);
        // resolve front to back so the focused tile is queued first
        let mut tiles: Vec<DrawTile<S::Resource>> = visuals
            .iter()
            .rev()
            .map(|visual| {
                let (resource, loaded) = self.resource_for(visual.index);
                DrawTile {
                    visual: *visual,
                    rect: projection.footprint(visual),
                    resource,
                    loaded,
                }
            })
            .collect();
        tiles.reverse();

        Frame {
            tiles,
            focused: self.motion.focused_index(),
            offset,
            phase: self.motion.phase(),
        }
    }

    /// [`FlowCover::frame`] for a host that only knows the elapsed time
    /// since its previous tick.
    pub fn advance(&mut self, dt: Duration) -> Frame<S::Resource> {
        let base = self.motion.last_tick().unwrap_or_else(Instant::now);
        self.frame(base + dt)
    }

    /// Focus `index` (clamped to the last tile), optionally animating.
    pub fn set_focused_index(
        &mut self,
        index: usize,
        animated: bool,
        at: Instant,
    ) -> Result<(), ConfigError> {
        let mut events = std::mem::take(&mut self.events);
        let result = self.motion.set_focused_index(index, animated, at, &mut events);
        self.dispatch(&mut events);
        self.events = events;
        result
    }

    // ========== CONFIGURATION ==========

    pub fn set_axis(&mut self, axis: SwipeAxis) {
        self.layout.axis = axis;
        self.motion.set_axis(axis);
        self.sync_pitch();
    }

    pub fn set_facing(&mut self, facing: Facing) {
        self.layout.facing = facing;
    }

    pub fn set_reflection(&mut self, reflection: Reflection) {
        self.layout.reflection = reflection;
    }

    pub fn set_spread(&mut self, spread: f32) -> Result<(), ConfigError> {
        self.layout.set_spread(spread)
    }

    pub fn set_rotation(&mut self, rotation: f32) -> Result<(), ConfigError> {
        self.layout.set_rotation(rotation)
    }

    pub fn set_depth(&mut self, depth: f32) -> Result<(), ConfigError> {
        self.layout.set_depth(depth)
    }

    pub fn set_alpha(&mut self, alpha: f32) -> Result<(), ConfigError> {
        self.layout.set_alpha(alpha)
    }

    pub fn set_window_radius(&mut self, radius: usize) -> Result<(), ConfigError> {
        self.layout.set_window_radius(radius)?;
        let visible = self.layout.max_visible_tiles();
        if self.cache.capacity() < visible {
            log::warn!(
                "window radius {radius} draws up to {visible} tiles but the cache holds {}",
                self.cache.capacity()
            );
        }
        Ok(())
    }

    pub fn set_display_ratio(&mut self, ratio: f32) -> Result<(), ConfigError> {
        self.layout.set_display_ratio(ratio)?;
        self.sync_pitch();
        Ok(())
    }

    pub fn set_tile_aspect(&mut self, aspect: f32) -> Result<(), ConfigError> {
        self.layout.set_tile_aspect(aspect)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.sync_pitch();
    }

    pub fn set_motion_config(&mut self, cfg: MotionConfig) -> Result<(), ConfigError> {
        self.motion.set_config(cfg)
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        preset.apply(&mut self.layout);
    }

    pub fn is_async_loading(&self) -> bool {
        self.async_loading
    }

    /// Switch between background loading and loading on the calling thread.
    pub fn set_async_loading(&mut self, enabled: bool) {
        if self.async_loading && !enabled {
            self.cache.clear_pending();
        }
        self.async_loading = enabled;
    }

    // ========== DATA ==========

    /// Drop the cached resource for `index` so the next frame reloads it.
    pub fn invalidate(&mut self, index: usize) {
        if self.cache.remove(&index).is_some() {
            log::debug!("invalidated tile {index}");
        }
    }

    /// Drop every cached resource and every load not yet started.
    pub fn invalidate_all(&mut self) {
        self.cache.clear_pending();
        self.cache.clear();
        log::debug!("invalidated all tiles");
    }

    /// Re-read the tile count from the source and discard cached resources.
    pub fn reload_data(&mut self, at: Instant) {
        self.tile_count = self.source.tile_count();
        let mut events = std::mem::take(&mut self.events);
        self.motion.set_tile_count(self.tile_count, at, &mut events);
        self.dispatch(&mut events);
        self.events = events;
        self.invalidate_all();
        log::debug!("reloaded data source: {} tiles", self.tile_count);
    }

    /// Index of the front-most tile drawn at `point`, given the current
    /// offset.
    pub fn tile_at(&self, point: Point) -> Option<usize> {
        let visuals = layout::layout(self.motion.offset(), self.tile_count, &self.layout);
        layout::hit_test(point, &visuals, &self.layout.projection(self.viewport))
    }

    fn resource_for(&self, index: usize) -> (Arc<S::Resource>, bool) {
        if self.async_loading {
            let source = Arc::clone(&self.source);
            let resource = self.cache.resolve(
                index,
                move || source.load_tile(index),
                &self.placeholder,
            );
            let loaded = !Arc::ptr_eq(&resource, &self.placeholder);
            (resource, loaded)
        } else {
            match self
                .cache
                .resolve_blocking(index, || self.source.load_tile(index))
            {
                Ok(resource) => (resource, true),
                Err(e) => {
                    log::warn!("failed to load tile {index}: {e}");
                    (Arc::clone(&self.placeholder), false)
                }
            }
        }
    }

    fn deliver_loads(&mut self) {
        for event in self.loads.drain() {
            match event {
                LoadEvent::Loaded { key, .. } => {
                    for observer in &self.observers {
                        observer.resource_loaded(key);
                    }
                }
                LoadEvent::Failed { key, error } => {
                    log::debug!("tile {key} stays on placeholder: {error}");
                }
            }
        }
    }

    fn dispatch(&self, events: &mut Vec<MotionEvent>) {
        for event in events.drain(..) {
            match event {
                MotionEvent::RollingBegan => {
                    self.observers.iter().for_each(|o| o.rolling_began());
                }
                MotionEvent::RollingEnded => {
                    self.observers.iter().for_each(|o| o.rolling_ended());
                }
                MotionEvent::FocusChanged(index) => {
                    self.observers.iter().for_each(|o| o.focus_changed(index));
                }
                MotionEvent::Tapped(point) => {
                    if let Some(index) = self.tile_at(point) {
                        log::debug!("tile {index} selected");
                        self.observers.iter().for_each(|o| o.tile_selected(index));
                    }
                }
            }
        }
    }

    fn sync_pitch(&mut self) {
        let pitch = self.layout.projection(self.viewport).pitch_px();
        if let Err(e) = self.motion.set_pitch_px(pitch) {
            log::warn!("ignoring unusable tile pitch: {e}");
        }
    }
}

impl<S: TileSource> fmt::Debug for FlowCover<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowCover")
            .field("tile_count", &self.tile_count)
            .field("offset", &self.motion.offset())
            .field("phase", &self.motion.phase())
            .field("layout", &self.layout)
            .field("viewport", &self.viewport)
            .field("observers", &self.observers.len())
            .field("async_loading", &self.async_loading)
            .finish_non_exhaustive()
    }
}

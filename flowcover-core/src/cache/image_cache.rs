use std::any::Any;
use std::fmt;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use flowcover_model::ConfigError;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;

use super::lru::LruCache;
use super::queue::{LoadRequest, LoaderQueue};
use crate::constants;
use crate::error::{LoadError, Result};

/// Completion notice posted by the loader thread.
#[derive(Debug)]
pub enum LoadEvent<K, R> {
    Loaded { key: K, resource: Arc<R> },
    Failed { key: K, error: String },
}

impl<K: Clone, R> Clone for LoadEvent<K, R> {
    fn clone(&self) -> Self {
        match self {
            LoadEvent::Loaded { key, resource } => LoadEvent::Loaded {
                key: key.clone(),
                resource: Arc::clone(resource),
            },
            LoadEvent::Failed { key, error } => LoadEvent::Failed {
                key: key.clone(),
                error: error.clone(),
            },
        }
    }
}

impl<K, R> LoadEvent<K, R> {
    pub fn key(&self) -> &K {
        match self {
            LoadEvent::Loaded { key, .. } | LoadEvent::Failed { key, .. } => key,
        }
    }
}

/// Callback invoked directly on the loader thread.
///
/// Implementations must not touch render-domain state; forward to the tick
/// domain instead (see [`ImageCache::subscribe`]).
pub trait CacheListener<K, R>: Send + Sync {
    fn resource_loaded(&self, key: &K, resource: &Arc<R>);

    fn resource_failed(&self, _key: &K, _error: &LoadError) {}
}

/// Receiving end of [`ImageCache::subscribe`], drained from the tick domain.
pub struct LoadEvents<K, R> {
    receiver: mpsc::UnboundedReceiver<LoadEvent<K, R>>,
}

impl<K, R> LoadEvents<K, R> {
    /// Next event if one is ready.
    pub fn try_next(&mut self) -> Option<LoadEvent<K, R>> {
        self.receiver.try_recv().ok()
    }

    /// Every event that is ready right now.
    pub fn drain(&mut self) -> Vec<LoadEvent<K, R>> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Block the current thread until an event arrives or the cache is gone.
    ///
    /// Must not be called from inside an async runtime.
    pub fn blocking_next(&mut self) -> Option<LoadEvent<K, R>> {
        self.receiver.blocking_recv()
    }
}

impl<K, R> fmt::Debug for LoadEvents<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadEvents")
            .field("queued", &self.receiver.len())
            .finish()
    }
}

struct State<K, R> {
    store: LruCache<K, R>,
    queue: LoaderQueue<K, R>,
}

struct Shared<K, R> {
    // store and queue share one lock so a completed load is inserted and
    // released from the in-flight set atomically
    state: Mutex<State<K, R>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<LoadEvent<K, R>>>>,
    listener: RwLock<Option<Arc<dyn CacheListener<K, R>>>>,
}

impl<K, R> Shared<K, R>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn notify(&self, event: LoadEvent<K, R>, error: Option<&LoadError>) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
        if let Some(listener) = self.listener.read().as_ref() {
            // the listener is host code running on the loader thread
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| match (&event, error) {
                (LoadEvent::Loaded { key, resource }, _) => {
                    listener.resource_loaded(key, resource)
                }
                (LoadEvent::Failed { key, .. }, Some(error)) => {
                    listener.resource_failed(key, error)
                }
                (LoadEvent::Failed { .. }, None) => {}
            }));
            if let Err(payload) = delivered {
                log::error!(
                    "cache listener panicked on {:?}: {}",
                    event.key(),
                    panic_message(payload.as_ref())
                );
            }
        }
    }
}

/// Bounded LRU cache that fills itself from a single background loader.
///
/// `resolve` never blocks on a load: on a miss it queues the loader and hands
/// back the placeholder. The loader thread is spawned on the first miss and
/// exits once the cache is dropped; loads already running at that point are
/// allowed to finish.
pub struct ImageCache<K, R> {
    shared: Arc<Shared<K, R>>,
    wake: Mutex<Option<mpsc::UnboundedSender<()>>>,
}

impl<K, R> ImageCache<K, R>
where
    K: Eq + Hash + Clone + Send + fmt::Debug + 'static,
    R: Send + Sync + 'static,
{
    pub fn new(capacity: i64) -> std::result::Result<Self, ConfigError> {
        let store = LruCache::new(capacity)?;
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    store,
                    queue: LoaderQueue::new(),
                }),
                subscribers: Mutex::new(Vec::new()),
                listener: RwLock::new(None),
            }),
            wake: Mutex::new(None),
        })
    }

    pub fn capacity(&self) -> usize {
        self.shared.state.lock().store.capacity()
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().store.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.shared.state.lock().store.contains_key(key)
    }

    pub fn recency_of(&self, key: &K) -> Option<u64> {
        self.shared.state.lock().store.recency_of(key)
    }

    pub fn get(&self, key: &K) -> Option<Arc<R>> {
        self.shared.state.lock().store.get(key)
    }

    pub fn peek(&self, key: &K) -> Option<Arc<R>> {
        self.shared.state.lock().store.peek(key)
    }

    pub fn put(&self, key: K, resource: impl Into<Arc<R>>) -> Vec<K> {
        self.shared.state.lock().store.put(key, resource)
    }

    pub fn remove(&self, key: &K) -> Option<Arc<R>> {
        self.shared.state.lock().store.remove(key)
    }

    pub fn truncate(&self, max: usize) -> Vec<K> {
        self.shared.state.lock().store.truncate(max)
    }

    /// Drop every entry. Loads in flight are not cancelled.
    pub fn clear(&self) {
        self.shared.state.lock().store.clear();
    }

    /// Return the cached resource, or queue `loader` and return
    /// `placeholder`.
    ///
    /// A key that is already queued or loading is not queued again.
    pub fn resolve<F>(&self, key: K, loader: F, placeholder: &Arc<R>) -> Arc<R>
    where
        F: FnOnce() -> Result<R> + Send + 'static,
    {
        let enqueued = {
            let mut state = self.shared.state.lock();
            if let Some(hit) = state.store.get(&key) {
                return hit;
            }
            state.queue.enqueue(LoadRequest::new(key, loader))
        };
        // an already queued key still needs a live worker to drain it
        if enqueued || !self.worker_alive() {
            self.wake_worker();
        }
        Arc::clone(placeholder)
    }

    /// Return the cached resource, or run `loader` on the calling thread and
    /// cache its result.
    pub fn resolve_blocking<F>(&self, key: K, loader: F) -> Result<Arc<R>>
    where
        F: FnOnce() -> Result<R>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let resource = Arc::new(loader()?);
        self.put(key, Arc::clone(&resource));
        Ok(resource)
    }

    /// Requests queued or currently loading.
    pub fn in_flight_count(&self) -> usize {
        self.shared.state.lock().queue.in_flight_count()
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.shared.state.lock().queue.is_in_flight(key)
    }

    /// Requests queued but not started.
    pub fn pending_len(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    /// Drop requests that have not started yet.
    pub fn clear_pending(&self) -> Vec<K> {
        let dropped = self.shared.state.lock().queue.clear_pending();
        if !dropped.is_empty() {
            log::debug!("cleared {} pending load(s)", dropped.len());
        }
        dropped
    }

    /// Open a channel that receives every subsequent load completion.
    pub fn subscribe(&self) -> LoadEvents<K, R> {
        let (tx, receiver) = mpsc::unbounded_channel();
        self.shared.subscribers.lock().push(tx);
        LoadEvents { receiver }
    }

    /// Install (or clear) the loader-thread callback.
    pub fn set_listener(&self, listener: Option<Arc<dyn CacheListener<K, R>>>) {
        *self.shared.listener.write() = listener;
    }

    fn worker_alive(&self) -> bool {
        self.wake.lock().as_ref().is_some_and(|tx| !tx.is_closed())
    }

    fn wake_worker(&self) {
        let mut wake = self.wake.lock();
        if wake.as_ref().is_some_and(|tx| tx.is_closed()) {
            log::warn!("Loader thread is gone, restarting it");
            *wake = None;
        }
        if wake.is_none() {
            match spawn_worker(Arc::clone(&self.shared)) {
                Ok(tx) => *wake = Some(tx),
                Err(e) => {
                    // requests stay queued; the next resolve retries the
                    // spawn, including one for a key that is already queued
                    log::error!("Failed to spawn loader thread: {e}");
                    return;
                }
            }
        }
        if let Some(tx) = wake.as_ref() {
            match tx.send(()) {
                Ok(()) => log::trace!("Sent wake-up signal to loader"),
                Err(e) => {
                    log::error!("Failed to send wake-up signal: {e:?}");
                    *wake = None;
                }
            }
        }
    }
}

impl<K, R> Drop for ImageCache<K, R> {
    fn drop(&mut self) {
        // the worker owns its own Arc of the shared state; emptying the queue
        // and dropping the wake sender lets it exit after any running load
        self.shared.state.lock().queue.discard_pending();
        self.wake.lock().take();
    }
}

impl<K: fmt::Debug, R> fmt::Debug for ImageCache<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("ImageCache")
            .field("len", &state.store.len())
            .field("capacity", &state.store.capacity())
            .field("queue", &state.queue)
            .field("worker_running", &self.wake.lock().is_some())
            .finish()
    }
}

fn spawn_worker<K, R>(shared: Arc<Shared<K, R>>) -> std::io::Result<mpsc::UnboundedSender<()>>
where
    K: Eq + Hash + Clone + Send + fmt::Debug + 'static,
    R: Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<()>();
    thread::Builder::new()
        .name(constants::cache::WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            log::debug!("loader thread started");
            while rx.blocking_recv().is_some() {
                drain_queue(&shared);
            }
            log::debug!("loader thread exiting");
        })?;
    Ok(tx)
}

fn drain_queue<K, R>(shared: &Shared<K, R>)
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    loop {
        let Some(request) = shared.state.lock().queue.pop_front() else {
            return;
        };
        let key = request.key.clone();
        log::debug!("loading {key:?}");

        let result = match panic::catch_unwind(AssertUnwindSafe(|| request.run())) {
            Ok((_, result)) => result,
            Err(payload) => Err(LoadError::Panicked(panic_message(payload.as_ref()))),
        };

        match result {
            Ok(resource) => {
                let resource = Arc::new(resource);
                {
                    let mut state = shared.state.lock();
                    state.store.put(key.clone(), Arc::clone(&resource));
                    state.queue.complete(&key);
                }
                shared.notify(LoadEvent::Loaded { key, resource }, None);
            }
            Err(error) => {
                log::warn!("failed to load {key:?}: {error}");
                shared.state.lock().queue.complete(&key);
                let event = LoadEvent::Failed {
                    key,
                    error: error.to_string(),
                };
                shared.notify(event, Some(&error));
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

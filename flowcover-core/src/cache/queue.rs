//! FIFO of pending loads with in-flight deduplication.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

use crate::error::Result;

/// Closure that materializes one resource on the loader thread.
pub type LoadFn<R> = Box<dyn FnOnce() -> Result<R> + Send + 'static>;

/// A single unit of background work: which key to fill and how.
pub struct LoadRequest<K, R> {
    pub key: K,
    loader: LoadFn<R>,
}

impl<K, R> LoadRequest<K, R> {
    pub fn new<F>(key: K, loader: F) -> Self
    where
        F: FnOnce() -> Result<R> + Send + 'static,
    {
        Self {
            key,
            loader: Box::new(loader),
        }
    }

    /// Consume the request, running its loader.
    pub fn run(self) -> (K, Result<R>) {
        let Self { key, loader } = self;
        let result = loader();
        (key, result)
    }
}

impl<K: fmt::Debug, R> fmt::Debug for LoadRequest<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadRequest")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Pending loads in arrival order.
///
/// A key is "in flight" from the moment it is enqueued until the worker
/// reports it complete, whether it succeeded or not. While in flight it is
/// never enqueued a second time.
pub struct LoaderQueue<K, R> {
    pending: VecDeque<LoadRequest<K, R>>,
    in_flight: HashSet<K>,
}

impl<K, R> Default for LoaderQueue<K, R> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
            in_flight: HashSet::new(),
        }
    }
}

impl<K, R> LoaderQueue<K, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest request. Its key stays in flight until
    /// [`LoaderQueue::complete`] is called.
    pub fn pop_front(&mut self) -> Option<LoadRequest<K, R>> {
        self.pending.pop_front()
    }

    /// Requests waiting to start.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Requests waiting or running.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub(crate) fn discard_pending(&mut self) {
        self.pending.clear();
    }
}

impl<K, R> LoaderQueue<K, R>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Append a request unless its key is already in flight.
    ///
    /// Returns `false` when the request was dropped as a duplicate.
    pub fn enqueue(&mut self, request: LoadRequest<K, R>) -> bool {
        if !self.in_flight.insert(request.key.clone()) {
            log::trace!("load for {:?} already in flight", request.key);
            return false;
        }
        self.pending.push_back(request);
        true
    }

    /// Mark `key` as no longer in flight.
    pub fn complete(&mut self, key: &K) {
        self.in_flight.remove(key);
    }

    /// Drop every request that has not started yet.
    ///
    /// A load already running on the worker is not affected.
    pub fn clear_pending(&mut self) -> Vec<K> {
        let dropped: Vec<K> = self.pending.drain(..).map(|r| r.key).collect();
        for key in &dropped {
            self.in_flight.remove(key);
        }
        dropped
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.contains(key)
    }
}

impl<K: fmt::Debug, R> fmt::Debug for LoaderQueue<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderQueue")
            .field("pending", &self.pending.len())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

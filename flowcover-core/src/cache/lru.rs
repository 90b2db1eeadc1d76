use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use flowcover_model::ConfigError;

/// Bounded key → resource store with least-recently-used eviction.
///
/// Every hit or insert stamps the entry with a fresh value from a
/// monotonically increasing counter; eviction removes the smallest stamp.
/// Keyed lookup goes through a hash map, the recency index is ordered so the
/// victim is found without scanning.
///
/// Not synchronized; [`super::ImageCache`] wraps one in a mutex.
#[derive(Debug)]
pub struct LruCache<K, R> {
    capacity: usize,
    map: HashMap<K, Entry<R>>,
    // recency marker -> key, smallest = least recently used
    order: BTreeMap<u64, K>,
    clock: u64,
}

#[derive(Debug)]
struct Entry<R> {
    resource: Arc<R>,
    recency: u64,
}

impl<K, R> LruCache<K, R> {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.order.values()
    }
}

impl<K, R> LruCache<K, R>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Create a cache holding at most `capacity` entries.
    ///
    /// Zero or negative capacities are rejected.
    pub fn new(capacity: i64) -> Result<Self, ConfigError> {
        if capacity < 1 {
            return Err(ConfigError::InvalidCapacity(capacity));
        }
        let capacity = usize::try_from(capacity)
            .map_err(|_| ConfigError::InvalidCapacity(capacity))?;
        Ok(Self {
            capacity,
            map: HashMap::with_capacity(capacity.min(1024)),
            order: BTreeMap::new(),
            clock: 0,
        })
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Current recency marker of `key`, if present.
    pub fn recency_of(&self, key: &K) -> Option<u64> {
        self.map.get(key).map(|e| e.recency)
    }

    /// Get a cloned Arc without moving LRU position
    pub fn peek(&self, key: &K) -> Option<Arc<R>> {
        self.map.get(key).map(|e| Arc::clone(&e.resource))
    }

    /// Get and bump LRU
    pub fn get(&mut self, key: &K) -> Option<Arc<R>> {
        let stamp = self.next_stamp();
        let entry = self.map.get_mut(key)?;
        self.order.remove(&entry.recency);
        entry.recency = stamp;
        self.order.insert(stamp, key.clone());
        Some(Arc::clone(&entry.resource))
    }

    /// Insert or replace, then evict least-recently-used entries until the
    /// cache is back within capacity. Returns the evicted keys.
    pub fn put(&mut self, key: K, resource: impl Into<Arc<R>>) -> Vec<K> {
        let stamp = self.next_stamp();
        let resource = resource.into();
        if let Some(entry) = self.map.get_mut(&key) {
            self.order.remove(&entry.recency);
            entry.recency = stamp;
            entry.resource = resource;
        } else {
            self.map.insert(key.clone(), Entry { resource, recency: stamp });
        }
        self.order.insert(stamp, key);
        self.evict_to(self.capacity)
    }

    pub fn remove(&mut self, key: &K) -> Option<Arc<R>> {
        let entry = self.map.remove(key)?;
        self.order.remove(&entry.recency);
        Some(entry.resource)
    }

    /// Evict least-recently-used entries until at most `max` remain.
    pub fn truncate(&mut self, max: usize) -> Vec<K> {
        self.evict_to(max)
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_to(&mut self, max: usize) -> Vec<K> {
        let mut evicted = Vec::new();
        while self.map.len() > max {
            let Some((_, victim)) = self.order.pop_first() else {
                break;
            };
            self.map.remove(&victim);
            log::debug!("cache evicted {victim:?}");
            evicted.push(victim);
        }
        evicted
    }
}

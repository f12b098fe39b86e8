//! SharedCache: one lock around a whole LruCache

use std::hash::Hash;
use std::sync::Arc;
use parking_lot::Mutex;

use crate::error::Result;
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Thread-safe LRU cache handle
///
/// Every operation takes the same mutex, because even a read moves the
/// entry in the recency list. Cloning the handle shares the cache and its
/// statistics.
pub struct SharedCache<K, V> {
    /// Cache guarded by a single lock
    inner: Arc<Mutex<LruCache<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new shared cache with the given capacity
    ///
    /// # Errors
    /// * `Error::ZeroCapacity` - if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity)?)),
            stats: Arc::new(CacheStats::new()),
        })
    }

    /// Get a copy of a cached value, marking it most recently used
    pub fn get(&self, key: &K) -> Option<V> {
        let value = self.inner.lock().get(key).cloned();

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }

        value
    }

    /// Insert or overwrite a value, returning the entry evicted to make room
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        let evicted = self.inner.lock().put(key, value);

        self.stats.record_write();
        if evicted.is_some() {
            self.stats.record_eviction();
        }

        evicted
    }

    /// Remove a value from the cache
    pub fn remove(&self, key: &K) -> Option<V> {
        let removed = self.inner.lock().remove(key);
        if removed.is_some() {
            self.stats.record_removal();
        }
        removed
    }

    /// Check whether a key is cached, without touching its recency
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Clear the cache and its statistics
    pub fn clear(&self) {
        self.inner.lock().clear();
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::thread;

    #[test]
    fn test_cache_zero_capacity() {
        let result = SharedCache::<u64, String>::new(0);
        assert!(matches!(result, Err(Error::ZeroCapacity)));
    }

    #[test]
    fn test_cache_hit() {
        let cache = SharedCache::new(10).unwrap();

        cache.put(7u64, b"test data".to_vec());

        assert_eq!(cache.get(&7), Some(b"test data".to_vec()));
        assert_eq!(cache.get(&7), Some(b"test data".to_vec()));
        assert_eq!(cache.stats().snapshot().hits, 2);
        assert_eq!(cache.stats().snapshot().misses, 0);
    }

    #[test]
    fn test_cache_miss() {
        let cache: SharedCache<u64, Vec<u8>> = SharedCache::new(10).unwrap();

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.stats().snapshot().misses, 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_eviction() {
        let cache = SharedCache::new(2).unwrap();

        cache.put(0u64, "data 0");
        cache.put(1, "data 1");
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.put(2, "data 2"), Some((0, "data 0")));
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.get(&1), Some("data 1"));
        assert_eq!(cache.get(&2), Some("data 2"));
        assert_eq!(cache.get(&0), None);

        let snapshot = cache.stats().snapshot();
        assert_eq!(snapshot.hits, 2);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.writes, 3);
        assert_eq!(snapshot.evictions, 1);
    }

    #[test]
    fn test_cache_remove() {
        let cache = SharedCache::new(10).unwrap();

        cache.put("k", 1);
        assert!(cache.contains(&"k"));
        assert_eq!(cache.remove(&"k"), Some(1));
        assert_eq!(cache.remove(&"k"), None);

        assert!(!cache.contains(&"k"));
        assert_eq!(cache.stats().snapshot().removals, 1);
    }

    #[test]
    fn test_cache_clear() {
        let cache = SharedCache::new(10).unwrap();

        cache.put(0, "data 0");
        cache.put(1, "data 1");
        cache.get(&0);
        assert_eq!(cache.len(), 2);

        cache.clear();

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 10);
        assert_eq!(cache.stats().snapshot().hits, 0);
    }

    #[test]
    fn test_cache_capacity_comes_from_inner_cache() {
        let cache: SharedCache<u32, u32> = SharedCache::new(5).unwrap();

        assert_eq!(cache.capacity(), 5);
        assert_eq!(cache.capacity(), cache.inner.lock().capacity());
    }

    #[test]
    fn test_cache_clones_share_state() {
        let cache = SharedCache::new(4).unwrap();
        let other = cache.clone();

        other.put(1, 10);

        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(other.stats().snapshot().hits, 1);
    }

    #[test]
    fn test_cache_concurrent_access() {
        let cache = SharedCache::new(8).unwrap();
        let threads = 4;
        let ops = 500;

        thread::scope(|s| {
            for t in 0..threads {
                let cache = cache.clone();
                s.spawn(move || {
                    for i in 0..ops {
                        let key = (t * 7 + i) % 32;
                        if i % 2 == 0 {
                            cache.put(key, key * 10);
                        } else if let Some(value) = cache.get(&key) {
                            assert_eq!(value, key * 10);
                        }
                        assert!(cache.len() <= 8);
                    }
                });
            }
        });

        let snapshot = cache.stats().snapshot();
        assert_eq!(snapshot.lookups(), (threads * ops / 2) as u64);
        assert_eq!(snapshot.writes, (threads * ops / 2) as u64);
        assert_eq!(cache.len(), 8);
    }
}

//! LRU (Least Recently Used) cache implementation
//!
//! Entries live in an arena of slots linked by index. Slots 0 and 1 are the
//! head and tail sentinels, so splicing never has to special-case the ends
//! of the recency list.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use ahash::RandomState;
use tracing::debug;

use crate::error::{Error, Result};

/// Head sentinel: `next` is the most recently used entry
const HEAD: usize = 0;

/// Tail sentinel: `prev` is the least recently used entry
const TAIL: usize = 1;

/// Upper bound on entries reserved up front; larger caches grow on demand
const MAX_PREALLOC: usize = 1024;

/// Slot in the recency list arena
struct Slot<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

impl<K, V> Slot<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    slots: Vec<Slot<K, V>>,
    free_list: Vec<usize>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Errors
    /// * `Error::ZeroCapacity` - if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        let reserved = capacity.min(MAX_PREALLOC);
        let mut slots = Vec::with_capacity(reserved + 2);
        slots.push(Slot::sentinel());
        slots.push(Slot::sentinel());

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserved, RandomState::new()),
            slots,
            free_list: Vec::new(),
            capacity,
        })
    }

    /// Get a value and mark it as most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].entry.as_ref().map(|(_, value)| value)
    }

    /// Get a value without touching its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.slots[idx].entry.as_ref().map(|(_, value)| value)
    }

    /// Check whether a key is cached, without touching its recency
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or overwrite a key-value pair
    ///
    /// The entry becomes the most recently used one. When a new key arrives
    /// at a full cache, the least recently used entry is evicted first and
    /// returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some((_, current)) = &mut self.slots[idx].entry {
                *current = value;
            }
            self.move_to_front(idx);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let idx = self.alloc_slot(key.clone(), value);
        self.link_front(idx);
        self.map.insert(key, idx);

        evicted
    }

    /// Remove a key from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        self.release(idx).map(|(_, value)| value)
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.slots.truncate(2);
        self.slots[HEAD] = Slot::sentinel();
        self.slots[TAIL] = Slot::sentinel();
        self.free_list.clear();
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.slots[HEAD].next == idx {
            return;
        }

        self.unlink(idx);
        self.link_front(idx);
    }

    fn link_front(&mut self, idx: usize) {
        let first = self.slots[HEAD].next;

        self.slots[idx].prev = HEAD;
        self.slots[idx].next = first;
        self.slots[first].prev = idx;
        self.slots[HEAD].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);

        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let lru = self.slots[TAIL].prev;
        if lru == HEAD {
            return None;
        }

        self.unlink(lru);
        let (key, value) = self.release(lru)?;
        self.map.remove(&key);
        debug!(slot = lru, capacity = self.capacity, "evicted least recently used entry");

        Some((key, value))
    }

    fn alloc_slot(&mut self, key: K, value: V) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx].entry = Some((key, value));
            idx
        } else {
            self.slots.push(Slot {
                entry: Some((key, value)),
                prev: HEAD,
                next: TAIL,
            });
            self.slots.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        let entry = self.slots[idx].entry.take();
        self.free_list.push(idx);
        entry
    }
}

impl<K, V> LruCache<K, V> {
    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate entries from most to least recently used
    ///
    /// Iteration is read-only and does not change recency.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            cursor: self.slots[HEAD].next,
            remaining: self.map.len(),
        }
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over cache entries, most recently used first
pub struct Iter<'a, K, V> {
    slots: &'a [Slot<K, V>],
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL {
            return None;
        }

        let slot = &self.slots[self.cursor];
        self.cursor = slot.next;
        self.remaining = self.remaining.saturating_sub(1);
        slot.entry.as_ref().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

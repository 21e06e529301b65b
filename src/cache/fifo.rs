//! FIFO Dict Module
//!
//! Bounded map that evicts in insertion order.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

use crate::cache::{BoundedMap, EvictionMode, OrderTracker, DEFAULT_MAX_ITEMS};

// == FIFO Dict ==
/// Capacity-bounded map evicting the least-recently-inserted entry.
///
/// Reads never reorder entries, and overwriting an existing key keeps its
/// original insertion position. A capacity of 0 disables storage entirely.
#[derive(Debug, Clone)]
pub struct FifoDict<K, V> {
    entries: HashMap<K, V>,
    order: OrderTracker<K>,
    max_items: usize,
}

impl<K, V> FifoDict<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new FifoDict holding at most `max_items` entries.
    pub fn new(max_items: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_items),
            order: OrderTracker::with_capacity(max_items),
            max_items,
        }
    }

    // == Get ==
    /// Returns the stored value; insertion order is left untouched.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    // == Set ==
    /// Inserts or overwrites a value.
    ///
    /// Returns the entry evicted to make room, if any.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.max_items == 0 {
            return None;
        }

        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.max_items {
            self.order
                .evict_oldest()
                .and_then(|oldest| self.entries.remove_entry(&oldest))
        } else {
            None
        };
        if evicted.is_some() {
            trace!("fifo dict evicted oldest entry");
        }

        self.order.push_newest(key.clone());
        self.entries.insert(key, value);
        evicted
    }

    // == Delete ==
    /// Removes an entry, returning its value. Absent keys are ignored.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.remove(key);
        Some(value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys ordered oldest-to-newest insertion.
    pub fn keys(&self) -> Vec<&K> {
        self.order.iter().collect()
    }

    /// Values ordered like [`keys`](Self::keys).
    pub fn values(&self) -> Vec<&V> {
        self.order.iter().filter_map(|k| self.entries.get(k)).collect()
    }

    /// Entries ordered like [`keys`](Self::keys).
    pub fn items(&self) -> Vec<(&K, &V)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get_key_value(k))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_items
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl<K, V> Default for FifoDict<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS)
    }
}

impl<K, V> BoundedMap for FifoDict<K, V>
where
    K: Eq + Hash + Clone,
{
    type Key = K;
    type Value = V;

    fn get(&mut self, key: &K) -> Option<&V> {
        FifoDict::get(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        FifoDict::get(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        FifoDict::set(self, key, value)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        FifoDict::delete(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        FifoDict::contains(self, key)
    }

    fn keys(&self) -> Vec<&K> {
        FifoDict::keys(self)
    }

    fn len(&self) -> usize {
        FifoDict::len(self)
    }

    fn capacity(&self) -> usize {
        self.max_items
    }

    fn clear(&mut self) {
        FifoDict::clear(self)
    }

    fn mode(&self) -> EvictionMode {
        EvictionMode::Fifo
    }
}

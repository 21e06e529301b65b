//! LRU Dict Module
//!
//! Bounded map that evicts the least recently used entry.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

use crate::cache::{BoundedMap, EvictionMode, OrderTracker, DEFAULT_MAX_ITEMS};

// == LRU Dict ==
/// Capacity-bounded map evicting the least-recently-used entry.
///
/// Both reads and overwrites count as use. A capacity of 0 disables
/// storage entirely.
#[derive(Debug, Clone)]
pub struct LruDict<K, V> {
    entries: HashMap<K, V>,
    order: OrderTracker<K>,
    max_items: usize,
}

impl<K, V> LruDict<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new LruDict holding at most `max_items` entries.
    pub fn new(max_items: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_items),
            order: OrderTracker::with_capacity(max_items),
            max_items,
        }
    }

    // == Get ==
    /// Returns the stored value and marks the key as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let (stored, value) = self.entries.get_key_value(key)?;
        self.order.touch(stored.clone());
        Some(value)
    }

    /// Returns the stored value without touching the access order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Marks a key as most recently used. Returns false when absent.
    pub fn promote(&mut self, key: &K) -> bool {
        if self.entries.contains_key(key) {
            self.order.touch(key.clone());
            true
        } else {
            false
        }
    }

    // == Set ==
    /// Inserts or overwrites a value, making the key most recently used.
    ///
    /// Returns the entry evicted to make room, if any.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.max_items == 0 {
            return None;
        }

        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            self.order.touch(key);
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
            trace!("lru dict evicted least recently used entry");
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

    /// Keys ordered least-to-most recently used.
    pub fn keys(&self) -> Vec<&K> {
        self.order.iter().collect()
    }

    pub fn values(&self) -> Vec<&V> {
        self.order.iter().filter_map(|k| self.entries.get(k)).collect()
    }

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

impl<K, V> Default for LruDict<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS)
    }
}

impl<K, V> BoundedMap for LruDict<K, V>
where
    K: Eq + Hash + Clone,
{
    type Key = K;
    type Value = V;

    fn get(&mut self, key: &K) -> Option<&V> {
        LruDict::get(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        LruDict::peek(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        LruDict::set(self, key, value)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        LruDict::delete(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LruDict::contains(self, key)
    }

    fn keys(&self) -> Vec<&K> {
        LruDict::keys(self)
    }

    fn len(&self) -> usize {
        LruDict::len(self)
    }

    fn capacity(&self) -> usize {
        self.max_items
    }

    fn clear(&mut self) {
        LruDict::clear(self)
    }

    fn mode(&self) -> EvictionMode {
        EvictionMode::Lru
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let dict: LruDict<String, String> = LruDict::new(10);
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
        assert_eq!(dict.capacity(), 10);
    }

    #[test]
    fn test_lru_evicts_least_recently_used() {
        let mut dict = LruDict::new(3);
        dict.set("key1", 1);
        dict.set("key2", 2);
        dict.set("key3", 3);

        // Reading key1 makes key2 the eviction candidate
        assert_eq!(dict.get(&"key1"), Some(&1));
        let evicted = dict.set("key4", 4);

        assert_eq!(evicted, Some(("key2", 2)));
        assert_eq!(dict.keys(), vec![&"key3", &"key1", &"key4"]);
    }

    #[test]
    fn test_lru_overwrite_promotes() {
        let mut dict = LruDict::new(3);
        dict.set("a", 1);
        dict.set("b", 2);
        dict.set("c", 3);

        assert_eq!(dict.set("a", 10), None);
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.keys(), vec![&"b", &"c", &"a"]);

        dict.set("d", 4);
        assert!(!dict.contains(&"b"));
        assert_eq!(dict.peek(&"a"), Some(&10));
    }

    #[test]
    fn test_lru_peek_does_not_promote() {
        let mut dict = LruDict::new(2);
        dict.set("a", 1);
        dict.set("b", 2);

        assert_eq!(dict.peek(&"a"), Some(&1));
        dict.set("c", 3);

        assert!(!dict.contains(&"a"));
        assert_eq!(dict.keys(), vec![&"b", &"c"]);
    }

    #[test]
    fn test_lru_promote() {
        let mut dict = LruDict::new(2);
        dict.set("a", 1);
        dict.set("b", 2);

        assert!(dict.promote(&"a"));
        assert!(!dict.promote(&"missing"));
        assert_eq!(dict.keys(), vec![&"b", &"a"]);
    }

    #[test]
    fn test_lru_get_missing_returns_none() {
        let mut dict: LruDict<&str, i32> = LruDict::new(2);
        assert_eq!(dict.get(&"nope"), None);
        assert!(dict.is_empty());
    }

    #[test]
    fn test_lru_zero_capacity_stores_nothing() {
        let mut dict = LruDict::new(0);
        dict.set(1, "one");
        assert_eq!(dict.get(&1), None);
        assert!(dict.keys().is_empty());
    }

    #[test]
    fn test_lru_delete_and_clear() {
        let mut dict = LruDict::new(4);
        dict.set("a", 1);
        dict.set("b", 2);

        assert_eq!(dict.delete(&"a"), Some(1));
        assert_eq!(dict.delete(&"a"), None);
        assert_eq!(dict.keys(), vec![&"b"]);

        dict.clear();
        assert!(dict.is_empty());
        assert!(dict.items().is_empty());
    }

    #[test]
    fn test_lru_same_key_never_grows() {
        let mut dict = LruDict::new(3);
        for i in 0..10 {
            dict.set("same", i);
        }
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.values(), vec![&9]);
    }
}

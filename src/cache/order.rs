//! Order Tracker Module
//!
//! Keeps the eviction order shared by the FIFO and LRU maps.

use std::collections::VecDeque;

// == Order Tracker ==
/// Tracks key order for bounded-map eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Newest (most recently inserted or used)
/// - Back = Oldest (next eviction candidate)
#[derive(Debug, Clone)]
pub struct OrderTracker<K> {
    order: VecDeque<K>,
}

impl<K> Default for OrderTracker<K> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }
}

impl<K: PartialEq> OrderTracker<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
        }
    }

    // == Touch ==
    /// Marks a key as newest.
    ///
    /// If key exists, removes it first then adds to front.
    pub fn touch(&mut self, key: K) {
        self.remove(&key);
        self.order.push_front(key);
    }

    // == Push ==
    /// Adds a key known to be absent as newest.
    pub fn push_newest(&mut self, key: K) {
        self.order.push_front(key);
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_back()
    }

    /// Returns the oldest key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.back()
    }

    /// Iterates keys oldest-to-newest.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.order.iter().any(|k| k == key)
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_new() {
        let tracker: OrderTracker<String> = OrderTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.peek_oldest(), None);
    }

    #[test]
    fn test_touch_existing_key_moves_to_newest() {
        let mut tracker = OrderTracker::new();
        tracker.touch("a");
        tracker.touch("b");
        tracker.touch("c");

        tracker.touch("a");

        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.peek_oldest(), Some(&"b"));
        assert_eq!(tracker.iter().copied().collect::<Vec<_>>(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_evict_oldest_order() {
        let mut tracker = OrderTracker::new();
        tracker.push_newest(1);
        tracker.push_newest(2);
        tracker.push_newest(3);

        assert_eq!(tracker.evict_oldest(), Some(1));
        assert_eq!(tracker.evict_oldest(), Some(2));
        assert_eq!(tracker.evict_oldest(), Some(3));
        assert_eq!(tracker.evict_oldest(), None);
    }

    #[test]
    fn test_remove_nonexistent_key() {
        let mut tracker = OrderTracker::new();
        tracker.touch("key1");
        tracker.touch("key2");

        tracker.remove(&"nonexistent");

        assert_eq!(tracker.len(), 2);
        assert!(tracker.contains(&"key1"));
        assert!(tracker.contains(&"key2"));
    }

    #[test]
    fn test_touch_same_key_multiple_times() {
        let mut tracker = OrderTracker::new();
        tracker.touch("key1");
        tracker.touch("key1");
        tracker.touch("key1");

        assert_eq!(tracker.len(), 1);
        tracker.clear();
        assert!(tracker.is_empty());
    }
}

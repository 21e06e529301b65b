//! Shared Map Module
//!
//! Lock-wrapped handle for using a bounded map from several threads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::{BoundedMap, EvictionMode};

// == Shared ==
/// Thread-safe handle around any [`BoundedMap`].
///
/// Clones share the same underlying map. Every call takes the lock for its
/// whole duration, so eviction and promotion stay consistent. Values are
/// returned by clone since no reference can outlive the lock.
#[derive(Debug)]
pub struct Shared<M> {
    inner: Arc<Mutex<M>>,
}

impl<M> Clone for Shared<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: BoundedMap> Shared<M> {
    // == Constructor ==
    pub fn new(map: M) -> Self {
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    // A panic inside `with` cannot leave the map half-updated, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, M> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the map.
    pub fn with<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut *self.lock())
    }

    pub fn get(&self, key: &M::Key) -> Option<M::Value>
    where
        M::Value: Clone,
    {
        self.lock().get(key).cloned()
    }

    pub fn peek(&self, key: &M::Key) -> Option<M::Value>
    where
        M::Value: Clone,
    {
        self.lock().peek(key).cloned()
    }

    pub fn set(&self, key: M::Key, value: M::Value) -> Option<(M::Key, M::Value)> {
        self.lock().set(key, value)
    }

    pub fn delete(&self, key: &M::Key) -> Option<M::Value> {
        self.lock().delete(key)
    }

    pub fn contains(&self, key: &M::Key) -> bool {
        self.lock().contains(key)
    }

    /// Snapshot of the current key order.
    pub fn keys(&self) -> Vec<M::Key>
    where
        M::Key: Clone,
    {
        self.lock().keys().into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn clear(&self) {
        self.lock().clear()
    }

    pub fn mode(&self) -> EvictionMode {
        self.lock().mode()
    }
}

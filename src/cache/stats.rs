//! Cache Statistics Module
//!
//! Tracks hybrid cache lookups by the layer that answered them.

use serde::Serialize;

// == Cache Stats ==
/// Lookup and eviction counters for a [`FlipCache`](crate::FlipCache).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered by the local map
    pub local_hits: u64,
    /// Lookups that missed locally but were found remotely
    pub remote_hits: u64,
    /// Lookups that fell through to the default value
    pub misses: u64,
    /// Entries dropped from the local map by capacity pressure
    pub evictions: u64,
    /// Current number of entries in the local map
    pub local_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate across both layers.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.local_hits + self.remote_hits;
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Fraction of lookups served without a remote round-trip.
    pub fn local_hit_rate(&self) -> f64 {
        let total = self.local_hits + self.remote_hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.local_hits as f64 / total as f64
        }
    }

    pub fn record_local_hit(&mut self) {
        self.local_hits += 1;
    }

    pub fn record_remote_hit(&mut self) {
        self.remote_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_local_entries(&mut self, count: usize) {
        self.local_entries = count;
    }
}

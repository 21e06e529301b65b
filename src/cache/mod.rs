//! Cache Module
//!
//! Capacity-bounded ordered maps used standalone and as the local layer of
//! [`FlipCache`](crate::FlipCache).
//!
//! None of the maps synchronize internally. Wrap one in [`Shared`] to use it
//! from several threads.

mod fifo;
mod lru;
mod order;
mod shared;
mod stats;


// Re-export public types
pub use fifo::FifoDict;
pub use lru::LruDict;
pub use order::OrderTracker;
pub use shared::Shared;
pub use stats::CacheStats;

// == Public Constants ==
/// Capacity used by `Default` for the standalone maps
pub const DEFAULT_MAX_ITEMS: usize = 1000;

// == Eviction Mode ==
/// Which end of the order gets evicted when a map is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionMode {
    /// Least recently inserted goes first
    Fifo,
    /// Least recently read or written goes first
    Lru,
}

// == Bounded Map Trait ==
/// Contract shared by [`FifoDict`] and [`LruDict`].
///
/// Absence is always a normal return, never an error. When `capacity()` is
/// 0 nothing is ever stored.
pub trait BoundedMap {
    type Key;
    type Value;

    /// Looks up a key, applying the map's access policy.
    fn get(&mut self, key: &Self::Key) -> Option<&Self::Value>;

    /// Looks up a key without changing the order.
    fn peek(&self, key: &Self::Key) -> Option<&Self::Value>;

    /// Inserts or overwrites, returning the evicted entry if one was dropped.
    fn set(&mut self, key: Self::Key, value: Self::Value) -> Option<(Self::Key, Self::Value)>;

    fn delete(&mut self, key: &Self::Key) -> Option<Self::Value>;

    fn contains(&self, key: &Self::Key) -> bool;

    /// Keys from the next eviction candidate to the newest.
    fn keys(&self) -> Vec<&Self::Key>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&mut self);

    fn mode(&self) -> EvictionMode;
}

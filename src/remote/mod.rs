//! Remote Store Module
//!
//! The persistent key-value store behind the local map.
//!
//! [`FlipCache`](crate::FlipCache) only needs the five commands of
//! [`RemoteStore`]. [`RedisStore`] talks to a real Redis server and
//! [`MemoryStore`] keeps everything in-process with the same expiry rules.

mod memory;
mod redis_store;

use std::time::Duration;

use crate::error::Result;

pub use self::memory::MemoryStore;
pub use self::redis_store::{RedisStore, DEFAULT_REDIS_URL};

// == Remote Store Trait ==
/// Blocking client for a remote key-value store.
///
/// Keys arrive already namespaced. Each call is one round-trip; retries and
/// timeouts belong to the implementation, not to the cache.
pub trait RemoteStore {
    /// Fetches a value, `None` when absent or expired.
    fn get(&mut self, key: &str) -> Result<Option<String>>;

    /// Stores a value, replacing any previous value and expiry.
    fn set(&mut self, key: &str, value: &str, expire: Option<Duration>) -> Result<()>;

    /// Removes a key. Absent keys are not an error.
    fn delete(&mut self, key: &str) -> Result<()>;

    fn exists(&mut self, key: &str) -> Result<bool>;

    /// Resets the time-to-live of an existing key. Absent keys are ignored.
    fn expire(&mut self, key: &str, expire: Duration) -> Result<()>;
}

// Lets a cache borrow a client the caller keeps ownership of.
impl<S: RemoteStore + ?Sized> RemoteStore for &mut S {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str, expire: Option<Duration>) -> Result<()> {
        (**self).set(key, value, expire)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn exists(&mut self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn expire(&mut self, key: &str, expire: Duration) -> Result<()> {
        (**self).expire(key, expire)
    }
}

impl<S: RemoteStore + ?Sized> RemoteStore for Box<S> {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str, expire: Option<Duration>) -> Result<()> {
        (**self).set(key, value, expire)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn exists(&mut self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn expire(&mut self, key: &str, expire: Duration) -> Result<()> {
        (**self).expire(key, expire)
    }
}

//! FlipCache - A hybrid cache
//!
//! A bounded in-process map fronting a Redis key-value store, with typed
//! value coercion and remote expiration.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod expire;
pub mod flip;
pub mod remote;

pub use cache::{BoundedMap, CacheStats, EvictionMode, FifoDict, LruDict, Shared};
pub use codec::{Codec, ValueKind};
pub use config::Config;
pub use error::{CacheError, Result};
pub use flip::{FlipCache, FlipCacheBuilder};
pub use remote::{MemoryStore, RedisStore, RemoteStore};

//! Hybrid Cache Module
//!
//! [`FlipCache`] fronts a [`RemoteStore`] with an [`LruDict`]. Writes go to
//! the remote store first and are mirrored locally; reads try the local map
//! and fall back to the remote store, repopulating the local map on a hit.
//!
//! Local entries carry no expiry of their own. A key that expires remotely
//! keeps being served from the local map until capacity pressure evicts it;
//! set `local_max` to 0 when remote expiry must always be honoured.
//!
//! Every operation takes `&mut self`, so one instance cannot be used from two
//! threads at once without an external lock (e.g. `Mutex<FlipCache<..>>`).
//! The local and remote writes are sequential, not atomic.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, LruDict};
use crate::codec::{Codec, ValueKind};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::remote::{RedisStore, RemoteStore, DEFAULT_REDIS_URL};

/// Local capacity used when `local_max` is not set
pub const DEFAULT_LOCAL_MAX: usize = 100;

const CUSTOM_PAIR_REQUIRED: &str =
    "value_encoder and value_decoder must be passed together when value_type is custom";

type EncoderFn<V> = Arc<dyn Fn(&V) -> String + Send + Sync>;
type DecoderFn<V> = Arc<dyn Fn(&str) -> std::result::Result<V, String> + Send + Sync>;

// == Flip Cache ==
/// Bounded local cache in front of a remote key-value store.
///
/// Remote keys are `"<name>:<key>"`, so several caches can share a store.
pub struct FlipCache<K, V, S = RedisStore> {
    name: String,
    local: LruDict<K, V>,
    remote: S,
    codec: Codec<V>,
    expire_time: Option<Duration>,
    refresh_expire_time_on_get: bool,
    persist_default_on_miss: bool,
    default: Option<V>,
    stats: CacheStats,
}

impl<K, V, S> FlipCache<K, V, S>
where
    K: fmt::Display + Eq + Hash + Clone,
    V: Clone,
    S: RemoteStore,
{
    fn remote_key(&self, key: &K) -> String {
        format!("{}:{}", self.name, key)
    }

    fn cache_locally(&mut self, key: K, value: V) {
        if let Some((evicted, _)) = self.local.set(key, value) {
            self.stats.record_eviction();
            debug!("FlipCache {}: evicted {} from local map", self.name, evicted);
        }
    }

    // == Get ==
    /// Returns the value for `key`, or the configured default on a miss.
    ///
    /// A value that is present remotely but fails to decode is an error,
    /// never replaced by the default.
    pub fn get(&mut self, key: &K) -> Result<Option<V>> {
        if let Some(value) = self.local.get(key) {
            let value = value.clone();
            self.stats.record_local_hit();
            debug!("FlipCache {}: local hit for {}", self.name, key);
            return Ok(Some(value));
        }

        let remote_key = self.remote_key(key);
        let Some(raw) = self.remote.get(&remote_key)? else {
            self.stats.record_miss();
            debug!("FlipCache {}: miss for {}", self.name, key);
            return self.default_for(key);
        };

        let value = self.codec.decode(&remote_key, &raw).map_err(|err| {
            warn!("FlipCache {}: {}", self.name, err);
            err
        })?;

        if self.refresh_expire_time_on_get {
            if let Some(ttl) = self.expire_time {
                self.remote.expire(&remote_key, ttl)?;
                debug!("FlipCache {}: refreshed expiry of {}", self.name, remote_key);
            }
        }

        self.stats.record_remote_hit();
        debug!("FlipCache {}: remote hit for {}", self.name, key);
        self.cache_locally(key.clone(), value.clone());
        Ok(Some(value))
    }

    fn default_for(&mut self, key: &K) -> Result<Option<V>> {
        match self.default.clone() {
            Some(value) if self.persist_default_on_miss => {
                self.set(key.clone(), value.clone())?;
                Ok(Some(value))
            }
            other => Ok(other),
        }
    }

    // == Set ==
    /// Writes `value` remotely (with the configured expiry), then locally.
    ///
    /// If the remote write fails the local map is left untouched.
    pub fn set(&mut self, key: K, value: V) -> Result<()> {
        let remote_key = self.remote_key(&key);
        let wire = self.codec.encode(&value)?;
        self.remote.set(&remote_key, &wire, self.expire_time)?;
        self.cache_locally(key, value);
        Ok(())
    }

    // == Delete ==
    /// Removes `key` from both layers. Absent keys are not an error.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        let remote_key = self.remote_key(key);
        self.remote.delete(&remote_key)?;
        self.local.delete(key);
        Ok(())
    }

    // == Contains ==
    /// True when held locally or present (and unexpired) remotely.
    pub fn contains(&mut self, key: &K) -> Result<bool> {
        if self.local.contains(key) {
            return Ok(true);
        }
        let remote_key = self.remote_key(key);
        self.remote.exists(&remote_key)
    }

    // == Refresh ==
    /// Marks `key` as recently used locally and re-applies the expiry
    /// remotely.
    pub fn refresh(&mut self, key: &K) -> Result<()> {
        self.local.promote(key);
        if let Some(ttl) = self.expire_time {
            let remote_key = self.remote_key(key);
            self.remote.expire(&remote_key, ttl)?;
        }
        Ok(())
    }

    /// Keys held in the local map, least recently used first.
    ///
    /// This is not the remote key set.
    pub fn keys(&self) -> Vec<&K> {
        self.local.keys()
    }

    /// Drops every local entry; the remote store is untouched.
    pub fn clear_local(&mut self) {
        self.local.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_local_entries(self.local.len());
        stats
    }
}

impl<K, V, S> FlipCache<K, V, S>
where
    K: Eq + Hash + Clone,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_max(&self) -> usize {
        self.local.capacity()
    }

    pub fn local_len(&self) -> usize {
        self.local.len()
    }

    pub fn expire_time(&self) -> Option<Duration> {
        self.expire_time
    }

    pub fn value_kind(&self) -> ValueKind {
        self.codec.kind()
    }

    pub fn remote(&self) -> &S {
        &self.remote
    }

    /// Direct access to the remote client, bypassing the local map.
    pub fn remote_mut(&mut self) -> &mut S {
        &mut self.remote
    }

    pub fn into_remote(self) -> S {
        self.remote
    }
}

impl<K, V, S> fmt::Debug for FlipCache<K, V, S>
where
    K: fmt::Debug + Eq + Hash + Clone,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlipCache")
            .field("name", &self.name)
            .field("local", &self.local.items())
            .field("expire_time", &self.expire_time)
            .field("value_kind", &self.codec.kind())
            .finish()
    }
}

// == Builder ==
/// Construction options for [`FlipCache`].
///
/// All options are fixed once the cache is built.
pub struct FlipCacheBuilder<K, V> {
    name: String,
    local_max: usize,
    expire_time: Option<Duration>,
    value_type: Option<ValueKind>,
    codec: Option<Codec<V>>,
    encoder: Option<EncoderFn<V>>,
    decoder: Option<DecoderFn<V>>,
    default: Option<V>,
    refresh_expire_time_on_get: bool,
    persist_default_on_miss: bool,
    _key: PhantomData<fn() -> K>,
}

impl<K, V> FlipCacheBuilder<K, V>
where
    K: fmt::Display + Eq + Hash + Clone,
    V: Clone + 'static,
{
    /// Starts a builder for the cache namespaced by `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_max: DEFAULT_LOCAL_MAX,
            expire_time: None,
            value_type: None,
            codec: None,
            encoder: None,
            decoder: None,
            default: None,
            refresh_expire_time_on_get: false,
            persist_default_on_miss: false,
            _key: PhantomData,
        }
    }

    /// Starts a builder from the cache fields of a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_name.clone())
            .local_max(config.local_max)
            .expire_time(config.expire_time)
            .refresh_expire_time_on_get(config.refresh_on_get)
    }

    /// Local map capacity; 0 disables local caching.
    pub fn local_max(mut self, local_max: usize) -> Self {
        self.local_max = local_max;
        self
    }

    /// Remote expiry applied on every write; `None` never expires.
    pub fn expire_time(mut self, expire_time: Option<Duration>) -> Self {
        self.expire_time = expire_time;
        self
    }

    /// Uses a ready-made codec instead of `value_type`.
    pub fn codec(mut self, codec: Codec<V>) -> Self {
        self.value_type = Some(codec.kind());
        self.codec = Some(codec);
        self
    }

    pub fn value_encoder<E>(mut self, encoder: E) -> Self
    where
        E: Fn(&V) -> String + Send + Sync + 'static,
    {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    pub fn value_decoder<D, DE>(mut self, decoder: D) -> Self
    where
        D: Fn(&str) -> std::result::Result<V, DE> + Send + Sync + 'static,
        DE: fmt::Display,
    {
        self.decoder = Some(Arc::new(move |raw: &str| {
            decoder(raw).map_err(|e| e.to_string())
        }));
        self
    }

    /// Value returned when a key is missing from both layers.
    pub fn value_default(mut self, value: V) -> Self {
        self.default = Some(value);
        self
    }

    /// Re-applies `expire_time` whenever a read is served remotely.
    pub fn refresh_expire_time_on_get(mut self, refresh: bool) -> Self {
        self.refresh_expire_time_on_get = refresh;
        self
    }

    /// Writes the default value through on a miss instead of only returning it.
    pub fn persist_default_on_miss(mut self, persist: bool) -> Self {
        self.persist_default_on_miss = persist;
        self
    }

    fn resolve_codec(&mut self) -> Result<Codec<V>> {
        let encoder = self.encoder.take();
        let decoder = self.decoder.take();
        let has_custom_parts = encoder.is_some() || decoder.is_some();

        let kind = match self.value_type {
            Some(kind) => kind,
            None if has_custom_parts => ValueKind::Custom,
            None => {
                return Err(CacheError::Config(
                    "value_type must be set".to_string(),
                ))
            }
        };

        if kind != ValueKind::Custom {
            if has_custom_parts {
                return Err(CacheError::Config(format!(
                    "value_encoder and value_decoder are only used with value_type custom, not {}",
                    kind
                )));
            }
            return self.codec.take().ok_or_else(|| {
                CacheError::Config(format!("no codec available for value_type {}", kind))
            });
        }

        match (encoder, decoder) {
            (Some(encoder), Some(decoder)) => Ok(Codec::custom(
                move |value: &V| encoder(value),
                move |raw: &str| decoder(raw),
            )),
            (None, None) => self
                .codec
                .take()
                .filter(|codec| codec.kind() == ValueKind::Custom)
                .ok_or_else(|| CacheError::Config(CUSTOM_PAIR_REQUIRED.to_string())),
            _ => Err(CacheError::Config(CUSTOM_PAIR_REQUIRED.to_string())),
        }
    }

    fn finish<S, F>(mut self, open_remote: F) -> Result<FlipCache<K, V, S>>
    where
        S: RemoteStore,
        F: FnOnce() -> Result<S>,
    {
        if self.name.is_empty() {
            return Err(CacheError::Config("name must not be empty".to_string()));
        }
        let codec = self.resolve_codec()?;
        let remote = open_remote()?;

        info!(
            "FlipCache {} ready: local_max={}, expire_time={:?}, value_type={}",
            self.name,
            self.local_max,
            self.expire_time,
            codec.kind()
        );

        Ok(FlipCache {
            name: self.name,
            local: LruDict::new(self.local_max),
            remote,
            codec,
            expire_time: self.expire_time,
            refresh_expire_time_on_get: self.refresh_expire_time_on_get,
            persist_default_on_miss: self.persist_default_on_miss,
            default: self.default,
            stats: CacheStats::new(),
        })
    }

    /// Builds the cache over a caller-supplied client.
    ///
    /// The client may be shared with other code (pass `&mut store`, or a
    /// cloneable handle); the cache does not assume exclusive use.
    pub fn build_with<S: RemoteStore>(self, remote: S) -> Result<FlipCache<K, V, S>> {
        self.finish(|| Ok(remote))
    }

    /// Builds the cache over a new Redis connection to `url`.
    ///
    /// Options are validated before connecting.
    pub fn connect(self, url: &str) -> Result<FlipCache<K, V, RedisStore>> {
        self.finish(|| RedisStore::connect(url))
    }

    /// Builds the cache over a new connection to [`DEFAULT_REDIS_URL`].
    pub fn build(self) -> Result<FlipCache<K, V, RedisStore>> {
        self.connect(DEFAULT_REDIS_URL)
    }
}

impl<K, V> FlipCacheBuilder<K, V>
where
    V: Serialize + DeserializeOwned + 'static,
{
    /// Selects a built-in coercion kind.
    ///
    /// [`ValueKind::Custom`] additionally needs `value_encoder` and
    /// `value_decoder`.
    pub fn value_type(mut self, kind: ValueKind) -> Self {
        self.value_type = Some(kind);
        self.codec = Codec::builtin(kind).ok();
        self
    }
}

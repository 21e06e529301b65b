//! Memory Store Module
//!
//! In-process [`RemoteStore`] with per-key expiry, used for tests and for
//! running without a Redis server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;
use crate::remote::RemoteStore;

// == Stored Value ==
/// A single stored value with its optional expiry deadline.
#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(value: String, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.and_then(deadline_after),
        }
    }

    /// Expired once the deadline is reached, not after it.
    fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

// Expiries too far out to represent as an Instant never fire.
fn deadline_after(ttl: Duration) -> Option<Instant> {
    Instant::now().checked_add(ttl)
}

// == Memory Store ==
/// Shared in-memory key-value store.
///
/// Clones share the same data, like several connections to one server.
/// Expired keys are dropped lazily on access or by
/// [`cleanup_expired`](Self::cleanup_expired).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, StoredValue>>>,
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredValue>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the live entry for `key`, dropping it first if expired.
    fn live<'a>(
        entries: &'a mut HashMap<String, StoredValue>,
        key: &str,
    ) -> Option<&'a mut StoredValue> {
        let now = Instant::now();
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }

    // == Time To Live ==
    /// Remaining time-to-live, `None` when absent or without expiry.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let mut entries = self.lock();
        let deadline = Self::live(&mut entries, key)?.expires_at?;
        Some(deadline.saturating_duration_since(Instant::now()))
    }

    /// Expires a key immediately, as if its time-to-live had elapsed.
    ///
    /// Returns false when the key was not present.
    pub fn expire_now(&self, key: &str) -> bool {
        let mut entries = self.lock();
        match Self::live(&mut entries, key) {
            Some(entry) => {
                entry.expires_at = Some(Instant::now());
                true
            }
            None => false,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!("Memory store cleanup: removed {} expired entries", removed);
        }
        removed
    }

    /// Number of unexpired keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unexpired keys starting with `prefix`, in no particular order.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let now = Instant::now();
        self.lock()
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl RemoteStore for MemoryStore {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        let mut entries = self.lock();
        Ok(Self::live(&mut entries, key).map(|entry| entry.value.clone()))
    }

    fn set(&mut self, key: &str, value: &str, expire: Option<Duration>) -> Result<()> {
        self.lock()
            .insert(key.to_string(), StoredValue::new(value.to_string(), expire));
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn exists(&mut self, key: &str) -> Result<bool> {
        let mut entries = self.lock();
        Ok(Self::live(&mut entries, key).is_some())
    }

    fn expire(&mut self, key: &str, expire: Duration) -> Result<()> {
        let mut entries = self.lock();
        if let Some(entry) = Self::live(&mut entries, key) {
            entry.expires_at = deadline_after(expire);
        }
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_set_and_get() {
        let mut store = MemoryStore::new();
        store.set("ns:key1", "value1", None).unwrap();

        assert_eq!(store.get("ns:key1").unwrap(), Some("value1".to_string()));
        assert_eq!(store.get("ns:missing").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overwrite_resets_expiry() {
        let mut store = MemoryStore::new();
        store.set("k", "v1", Some(Duration::from_secs(60))).unwrap();
        store.set("k", "v2", None).unwrap();

        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));
        assert_eq!(store.ttl("k"), None);
    }

    #[test]
    fn test_ttl_expiration() {
        let mut store = MemoryStore::new();
        store.set("k", "v", Some(Duration::from_millis(100))).unwrap();
        assert!(store.exists("k").unwrap());

        sleep(Duration::from_millis(150));

        assert_eq!(store.get("k").unwrap(), None);
        assert!(!store.exists("k").unwrap());
    }

    #[test]
    fn test_expire_refreshes_deadline() {
        let mut store = MemoryStore::new();
        store.set("k", "v", Some(Duration::from_secs(1))).unwrap();
        store.expire("k", Duration::from_secs(100)).unwrap();

        let remaining = store.ttl("k").unwrap();
        assert!(remaining > Duration::from_secs(99));
        assert!(remaining <= Duration::from_secs(100));
    }

    #[test]
    fn test_huge_expiry_never_fires() {
        let mut store = MemoryStore::new();
        store.set("k", "v", Some(Duration::MAX)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        assert_eq!(store.ttl("k"), None);

        store.set("j", "v", Some(Duration::from_secs(1))).unwrap();
        store.expire("j", Duration::MAX).unwrap();
        assert!(store.exists("j").unwrap());
        assert_eq!(store.cleanup_expired(), 0);
    }

    #[test]
    fn test_expire_absent_key_is_noop() {
        let mut store = MemoryStore::new();
        store.expire("missing", Duration::from_secs(1)).unwrap();
        assert!(!store.exists("missing").unwrap());
    }

    #[test]
    fn test_expire_now() {
        let mut store = MemoryStore::new();
        store.set("k", "v", None).unwrap();

        assert!(store.expire_now("k"));
        assert!(!store.expire_now("k"));
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_delete_absent_key() {
        let mut store = MemoryStore::new();
        store.delete("nothing").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let mut writer = MemoryStore::new();
        let mut reader = writer.clone();

        writer.set("shared", "yes", None).unwrap();
        assert_eq!(reader.get("shared").unwrap(), Some("yes".to_string()));
    }

    #[test]
    fn test_cleanup_expired() {
        let mut store = MemoryStore::new();
        store.set("short", "v", Some(Duration::from_millis(50))).unwrap();
        store.set("long", "v", Some(Duration::from_secs(60))).unwrap();
        store.set("forever", "v", None).unwrap();

        sleep(Duration::from_millis(100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 2);
        assert!(store.exists("long").unwrap());
    }

    #[test]
    fn test_keys_with_prefix() {
        let mut store = MemoryStore::new();
        store.set("a:1", "v", None).unwrap();
        store.set("a:2", "v", None).unwrap();
        store.set("b:1", "v", None).unwrap();

        let mut keys = store.keys_with_prefix("a:");
        keys.sort();
        assert_eq!(keys, vec!["a:1".to_string(), "a:2".to_string()]);
    }
}

//! Redis Store Module
//!
//! [`RemoteStore`] over a blocking Redis connection.

use std::fmt;
use std::time::Duration;

use redis::{Client, Commands, Connection};
use tracing::info;

use crate::error::{CacheError, Result};
use crate::remote::RemoteStore;

/// Address used when no client is supplied
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

// == Redis Store ==
/// Redis client owning one connection.
///
/// Expirations are sent with millisecond precision (`SET PX`, `PEXPIRE`).
pub struct RedisStore {
    conn: Connection,
    url: Option<String>,
}

impl RedisStore {
    // == Constructors ==
    /// Opens a connection to the server at `url`.
    pub fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = client.get_connection()?;
        info!("Connected to redis at {}", url);
        Ok(Self {
            conn,
            url: Some(url.to_string()),
        })
    }

    /// Wraps an existing connection, e.g. one configured with auth or TLS.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn, url: None }
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").field("url", &self.url).finish()
    }
}

// Redis rejects a zero PX, so sub-millisecond durations round up.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX).max(1)
}

impl RemoteStore for RedisStore {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        let raw: Option<Vec<u8>> = self.conn.get(key)?;
        raw.map(|bytes| {
            String::from_utf8(bytes).map_err(|e| CacheError::Decode {
                key: key.to_string(),
                message: format!("value is not valid UTF-8: {}", e),
            })
        })
        .transpose()
    }

    fn set(&mut self, key: &str, value: &str, expire: Option<Duration>) -> Result<()> {
        match expire {
            Some(ttl) => self.conn.pset_ex::<_, _, ()>(key, value, millis(ttl))?,
            None => self.conn.set::<_, _, ()>(key, value)?,
        }
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.conn.del::<_, ()>(key)?;
        Ok(())
    }

    fn exists(&mut self, key: &str) -> Result<bool> {
        Ok(self.conn.exists(key)?)
    }

    fn expire(&mut self, key: &str, expire: Duration) -> Result<()> {
        let ms = i64::try_from(millis(expire)).unwrap_or(i64::MAX);
        self.conn.pexpire::<_, ()>(key, ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_rounds_up_to_one() {
        assert_eq!(millis(Duration::from_micros(10)), 1);
        assert_eq!(millis(Duration::ZERO), 1);
        assert_eq!(millis(Duration::from_secs(2)), 2000);
    }

    #[test]
    fn test_connect_rejects_invalid_url() {
        let err = RedisStore::connect("not a url").unwrap_err();
        assert!(err.is_remote());
    }
}

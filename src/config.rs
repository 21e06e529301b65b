//! Configuration Module
//!
//! Handles loading cache and benchmark settings from environment variables.

use std::env;
use std::time::Duration;

use crate::flip::DEFAULT_LOCAL_MAX;
use crate::remote::DEFAULT_REDIS_URL;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Redis connection URL
    pub redis_url: String,
    /// Namespace prepended to every remote key
    pub cache_name: String,
    /// Local map capacity, 0 disables local caching
    pub local_max: usize,
    /// Remote expiry for written keys, None = never expire
    pub expire_time: Option<Duration>,
    /// Re-apply the expiry on every remote read
    pub refresh_on_get: bool,
    /// Number of keys written and read per benchmark round
    pub bench_keys: usize,
    /// Benchmark repetitions
    pub bench_rounds: usize,
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis server URL (default: redis://127.0.0.1:6379)
    /// - `CACHE_NAME` - Key namespace (default: flipcache)
    /// - `LOCAL_MAX` - Local map capacity (default: 100)
    /// - `EXPIRE_TIME` - Remote expiry in seconds (default: none)
    /// - `REFRESH_ON_GET` - Refresh expiry on remote reads (default: false)
    /// - `BENCH_KEYS` - Keys per benchmark round (default: 1000)
    /// - `BENCH_ROUNDS` - Benchmark repetitions (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            cache_name: env::var("CACHE_NAME").unwrap_or(defaults.cache_name),
            local_max: parse_env("LOCAL_MAX").unwrap_or(defaults.local_max),
            expire_time: parse_env::<u64>("EXPIRE_TIME")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            refresh_on_get: parse_env("REFRESH_ON_GET").unwrap_or(defaults.refresh_on_get),
            bench_keys: parse_env("BENCH_KEYS").unwrap_or(defaults.bench_keys),
            bench_rounds: parse_env::<usize>("BENCH_ROUNDS")
                .filter(|rounds| *rounds > 0)
                .unwrap_or(defaults.bench_rounds),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            cache_name: "flipcache".to_string(),
            local_max: DEFAULT_LOCAL_MAX,
            expire_time: None,
            refresh_on_get: false,
            bench_keys: 1000,
            bench_rounds: 5,
        }
    }
}

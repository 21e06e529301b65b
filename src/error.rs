//! Error types for the hybrid cache
//!
//! Provides unified error handling using thiserror.
//!
//! A missing key is never an error: lookups return the configured default
//! (or `None` for the bounded maps). Everything below propagates to the
//! caller of the operation that triggered it, without retry.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid construction options (fatal, raised by the builder)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Value could not be converted to its wire representation
    #[error("Encode failed: {0}")]
    Encode(String),

    /// Remote value present but not parseable under the configured kind
    #[error("Decode failed for key {key}: {message}")]
    Decode { key: String, message: String },

    /// Remote store I/O or protocol failure
    #[error("Remote store error: {0}")]
    Remote(String),
}

impl CacheError {
    /// Returns true for errors coming from the remote store connection.
    pub fn is_remote(&self) -> bool {
        matches!(self, CacheError::Remote(_))
    }
}

// == Redis Conversion ==
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Remote(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

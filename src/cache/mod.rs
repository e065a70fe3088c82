//! Key/value cache with per-entry expiry.
//!
//! Only the trending gate talks to the cache. Expiry is entirely the
//! backend's business: a value either comes back from [`TrendingCache::get`]
//! or it doesn't.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("cache operation timed out")]
    Timeout,

    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TrendingCache: Send + Sync {
    /// Returns the live value stored under `key`, or `None` once it has expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous value, for `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Stand-in used when no cache backend could be reached at start-up.
///
/// Every call fails, so readers always fall through to the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCache;

#[async_trait]
impl TrendingCache for DisabledCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("no cache backend configured".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("no cache backend configured".to_string()))
    }
}

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::info;

use super::{CacheError, TrendingCache};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis-backed cache.
///
/// Holds one multiplexed [`ConnectionManager`] for the whole process; it is
/// cheap to clone per command and reconnects on its own after a drop.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    op_timeout: Duration,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Opens the process-wide connection. Each later `GET`/`SET` is bounded
    /// by `op_timeout`.
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let connection = bounded(CONNECT_TIMEOUT, client.get_connection_manager()).await?;
        info!("Connected to Redis");

        Ok(Self {
            connection,
            op_timeout,
        })
    }

    /// Drops the connection. Call once at shutdown, after the server has
    /// stopped handing out clones.
    pub async fn close(self) {
        drop(self.connection);
        info!("Redis connection closed");
    }
}

async fn bounded<T, F>(limit: Duration, op: F) -> Result<T, CacheError>
where
    F: Future<Output = Result<T, redis::RedisError>>,
{
    tokio::time::timeout(limit, op)
        .await
        .map_err(|_| CacheError::Timeout)?
        .map_err(CacheError::from)
}

#[async_trait]
impl TrendingCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut connection = self.connection.clone();
        bounded(self.op_timeout, connection.get::<_, Option<String>>(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        // SET EX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        bounded(
            self.op_timeout,
            connection.set_ex::<_, _, ()>(key, value, seconds),
        )
        .await
    }
}

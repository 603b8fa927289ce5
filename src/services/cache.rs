use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::feed::{FeedError, ReserveCache};
use crate::models::CandidateProfile;

/// Errors that can occur with feed cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<CacheError> for FeedError {
    fn from(err: CacheError) -> Self {
        FeedError::CacheUnavailable(err.to_string())
    }
}

/// Redis-backed reserve tranche cache.
///
/// One entry per user holding the reserved portion of a computed feed as a
/// JSON array. Entries are immutable once written and single-use: reads go
/// through GETDEL so return-and-delete is one atomic step, and unconsumed
/// entries expire server-side.
pub struct FeedCacheStore {
    // ConnectionManager behind a Mutex for interior mutability
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
}

impl FeedCacheStore {
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
        })
    }

    /// Cache key for a user's reserved feed tranche
    pub fn feed_key(user_key: i64) -> String {
        format!("feed:{}", user_key)
    }

    async fn take_inner(&self, user_key: i64) -> Result<Option<Vec<CandidateProfile>>, CacheError> {
        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GETDEL")
            .arg(Self::feed_key(user_key))
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        match value {
            Some(json) => {
                tracing::trace!("feed cache hit for user {}", user_key);
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => {
                tracing::trace!("feed cache miss for user {}", user_key);
                Ok(None)
            }
        }
    }

    async fn put_inner(
        &self,
        user_key: i64,
        candidates: &[CandidateProfile],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(candidates)?;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(Self::feed_key(user_key))
            .arg(ttl.as_secs())
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("reserved {} candidates for user {}", candidates.len(), user_key);
        Ok(())
    }
}

#[async_trait]
impl ReserveCache for FeedCacheStore {
    async fn take(&self, user_key: i64) -> Result<Option<Vec<CandidateProfile>>, FeedError> {
        Ok(self.take_inner(user_key).await?)
    }

    async fn put(
        &self,
        user_key: i64,
        candidates: &[CandidateProfile],
        ttl: Duration,
    ) -> Result<(), FeedError> {
        Ok(self.put_inner(user_key, candidates, ttl).await?)
    }
}

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;

use crate::core::swipes::{SwipeError, SwipePairStore};
use crate::models::SwipeDirection;

/// Write the caller's swipe field, then read the counterpart's, as one unit
/// on the server. Concurrent swipes on the same pair are linearized here.
const SWIPE_AND_READ: &str = r#"
redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
return redis.call('HGET', KEYS[1], ARGV[3])
"#;

/// Redis-backed swipe pair store.
///
/// Each pair's swipe state is a hash of at most two fields under the
/// canonical pair key. Atomicity of the write-then-read step is delegated to
/// a server-side script, so no client-side locking is involved.
pub struct RedisPairStore {
    // ConnectionManager behind a Mutex for interior mutability
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    script: redis::Script,
}

impl RedisPairStore {
    pub async fn connect(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            script: redis::Script::new(SWIPE_AND_READ),
        })
    }
}

#[async_trait]
impl SwipePairStore for RedisPairStore {
    async fn swipe_and_read(
        &self,
        pair_key: &str,
        own_field: &str,
        direction: SwipeDirection,
        counterpart_field: &str,
    ) -> Result<Option<SwipeDirection>, SwipeError> {
        let mut conn = self.redis.lock().await;
        let counterpart: Option<String> = self
            .script
            .key(pair_key)
            .arg(own_field)
            .arg(direction.as_str())
            .arg(counterpart_field)
            .invoke_async(&mut *conn)
            .await
            .map_err(|e| SwipeError::StoreUnavailable(e.to_string()))?;
        drop(conn);

        tracing::trace!("swipe recorded under {}: counterpart={:?}", pair_key, counterpart);

        match counterpart {
            None => Ok(None),
            Some(value) => value
                .parse::<SwipeDirection>()
                .map(Some)
                // Only this service writes these fields; anything else in
                // them means the store state is unusable.
                .map_err(SwipeError::StoreUnavailable),
        }
    }
}

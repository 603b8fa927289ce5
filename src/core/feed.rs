use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::registry::FilterRegistry;
use crate::models::CandidateProfile;

/// Share of a computed feed held back in cache for the next request.
pub const RESERVE_FRACTION: f64 = 0.6;

/// Errors that can occur when serving a feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// Malformed input; nothing was computed or written. Not retryable.
    #[error("invalid feed request: {0}")]
    InvalidArgument(String),

    /// The geo-search backend could not be reached or answered with an
    /// error. Retryable.
    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    /// The reserve cache could not be reached. Retryable.
    #[error("feed cache unavailable: {0}")]
    CacheUnavailable(String),
}

/// Black-box ranked candidate source.
///
/// Results may lag the most recent profile writes (the search index is fed
/// asynchronously); a very recently created profile being absent is not an
/// error.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn retrieve_candidates(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<CandidateProfile>, FeedError>;
}

/// Single-use per-user reserve tranche storage.
///
/// Entries are immutable once written and consumed atomically: `take` both
/// returns and deletes, so the same reserve is never served twice.
#[async_trait]
pub trait ReserveCache: Send + Sync {
    async fn take(&self, user_key: i64) -> Result<Option<Vec<CandidateProfile>>, FeedError>;

    async fn put(
        &self,
        user_key: i64,
        candidates: &[CandidateProfile],
        ttl: Duration,
    ) -> Result<(), FeedError>;
}

/// Serves feeds in two tranches to reduce repeated geo-search calls.
///
/// A cache miss costs one search round trip and yields two feed pages: the
/// 40% suffix of the filtered ranking is returned immediately and the 60%
/// prefix is reserved in the cache for the next request within the TTL.
pub struct FeedService {
    search: Arc<dyn CandidateSource>,
    cache: Arc<dyn ReserveCache>,
    filters: Arc<FilterRegistry>,
    reserve_ttl: Duration,
}

impl FeedService {
    pub fn new(
        search: Arc<dyn CandidateSource>,
        cache: Arc<dyn ReserveCache>,
        filters: Arc<FilterRegistry>,
        reserve_ttl: Duration,
    ) -> Self {
        Self { search, cache, filters, reserve_ttl }
    }

    /// Return the user's next feed page.
    ///
    /// Cache hit: the reserved tranche verbatim, consumed on read. Cache
    /// miss: search, drop self and previously shown candidates (exposure is
    /// recorded by the membership check itself), reserve the 60% prefix,
    /// return the rest. The cache write happens only after the full filtered
    /// result is computed, so an abandoned request never leaves a partial
    /// entry; a failed search writes nothing.
    pub async fn fetch_feed(
        &self,
        user_key: i64,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<CandidateProfile>, FeedError> {
        validate_coordinates(latitude, longitude, radius_km)?;

        if let Some(reserved) = self.cache.take(user_key).await? {
            tracing::debug!("serving {} reserved candidates to user {}", reserved.len(), user_key);
            return Ok(reserved);
        }

        let hits = self.search.retrieve_candidates(latitude, longitude, radius_km).await?;
        let total = hits.len();

        let filtered: Vec<CandidateProfile> = hits
            .into_iter()
            .filter(|candidate| candidate.user_id != user_key)
            .filter(|candidate| {
                !self
                    .filters
                    .check_and_mark(&candidate.user_id.to_string(), user_key)
            })
            .collect();

        let split = (filtered.len() as f64 * RESERVE_FRACTION).floor() as usize;
        let reserve = &filtered[..split];
        let immediate = &filtered[split..];

        if !reserve.is_empty() {
            self.cache.put(user_key, reserve, self.reserve_ttl).await?;
        }

        tracing::info!(
            "computed feed for user {}: {} hits, {} after filtering, {} reserved, {} returned",
            user_key,
            total,
            filtered.len(),
            reserve.len(),
            immediate.len()
        );

        Ok(immediate.to_vec())
    }
}

fn validate_coordinates(latitude: f64, longitude: f64, radius_km: f64) -> Result<(), FeedError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(FeedError::InvalidArgument(format!("latitude {} out of range", latitude)));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(FeedError::InvalidArgument(format!("longitude {} out of range", longitude)));
    }
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(FeedError::InvalidArgument(format!("radius {} must be positive", radius_km)));
    }
    Ok(())
}

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::core::pairing::{canonical_pair, pair_key, swipe_field};
use crate::models::{MatchDecision, MatchOutcome, SwipeDirection, SwipeEvent};

/// Errors that can occur when recording swipes
#[derive(Debug, Error)]
pub enum SwipeError {
    /// Malformed input; nothing was written. Not retryable.
    #[error("invalid swipe: {0}")]
    InvalidArgument(String),

    /// A backing store could not be reached. Retryable.
    #[error("swipe store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Scripted-transaction capability of the swipe key-value store.
///
/// One atomic round trip: write `direction` into `own_field` under
/// `pair_key`, then read back `counterpart_field` from the same key, both as
/// a single unit on the server. The store's linearization of these units is
/// what guarantees that concurrent swipes on one pair cannot both observe
/// "no match" when both directions are right.
#[async_trait]
pub trait SwipePairStore: Send + Sync {
    async fn swipe_and_read(
        &self,
        pair_key: &str,
        own_field: &str,
        direction: SwipeDirection,
        counterpart_field: &str,
    ) -> Result<Option<SwipeDirection>, SwipeError>;
}

/// External match/swipe persistence.
///
/// `create_match` must be idempotent by canonical pair (unique constraint or
/// equivalent): retries and resubmissions of an already-resolved swipe report
/// `Duplicate` instead of creating a second match. `insert_swipe` is a plain
/// durable append with no dedup requirement.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn create_match(&self, user_a: i64, user_b: i64) -> Result<MatchOutcome, SwipeError>;

    async fn insert_swipe(
        &self,
        user: i64,
        target: i64,
        direction: SwipeDirection,
    ) -> Result<(), SwipeError>;
}

/// Records swipes and detects mutual matches.
pub struct SwipeCoordinator {
    pairs: Arc<dyn SwipePairStore>,
    matches: Arc<dyn MatchStore>,
}

impl SwipeCoordinator {
    pub fn new(pairs: Arc<dyn SwipePairStore>, matches: Arc<dyn MatchStore>) -> Self {
        Self { pairs, matches }
    }

    /// Record one swipe and report whether it completed a mutual match.
    ///
    /// The write-then-read runs as one atomic unit in the pair store, so the
    /// first-arriving swipe of a pair reads an absent counterpart field and
    /// never sees the match; only the completing swipe does. The match
    /// creation itself happens after the transaction: a crash in between can
    /// lose the match, which the store-side unique pair constraint keeps
    /// safe to retry.
    pub async fn record_swipe(
        &self,
        user_a: i64,
        user_b: i64,
        direction: SwipeDirection,
    ) -> Result<MatchDecision, SwipeError> {
        if user_a == user_b {
            return Err(SwipeError::InvalidArgument(format!(
                "user {} cannot swipe on themselves",
                user_a
            )));
        }

        let key = pair_key(user_a, user_b);
        let counterpart = self
            .pairs
            .swipe_and_read(&key, &swipe_field(user_a), direction, &swipe_field(user_b))
            .await?;

        if direction != SwipeDirection::Right || counterpart != Some(SwipeDirection::Right) {
            return Ok(MatchDecision::NotMatched);
        }

        match self.matches.create_match(user_a, user_b).await? {
            MatchOutcome::Created => {
                let (lo, hi) = canonical_pair(user_a, user_b);
                tracing::info!("mutual match created for pair {}:{}", lo, hi);
            }
            MatchOutcome::Duplicate => {
                tracing::debug!("match for {} and {} already recorded", user_a, user_b);
            }
        }

        Ok(MatchDecision::Matched)
    }

    /// Bulk swipe ingestion for offline/backfill use.
    ///
    /// Validates the whole batch before touching the store, then appends each
    /// swipe to the durable log. This path never evaluates the mutual-match
    /// condition, so replaying historical data cannot flood match creation.
    /// Returns the number of swipes appended.
    pub async fn ingest_batch(&self, swipes: &[SwipeEvent]) -> Result<usize, SwipeError> {
        for swipe in swipes {
            if swipe.user_a == swipe.user_b {
                return Err(SwipeError::InvalidArgument(format!(
                    "user {} cannot swipe on themselves",
                    swipe.user_a
                )));
            }
        }

        for swipe in swipes {
            self.matches
                .insert_swipe(swipe.user_a, swipe.user_b, swipe.direction)
                .await?;
        }

        tracing::debug!("ingested batch of {} swipes", swipes.len());
        Ok(swipes.len())
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

use crate::core::bitfilter::BitFilter;

/// Errors that can occur with filter registry operations
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("no seen-filter registered for user {0}")]
    FilterNotFound(i64),
}

const SHARD_COUNT: usize = 16;

/// Registry of one seen-filter per user.
///
/// Filters are created on an explicit user-creation event or lazily on the
/// first membership check, and live for the lifetime of the process. Entries
/// are never deleted, so the map grows with the active user population.
///
/// Locking is two-level: the user map is sharded so that registering a new
/// user only contends within one shard, and each filter sits behind its own
/// mutex so bit mutations for unrelated users never contend. No lock is ever
/// held across an await point.
pub struct FilterRegistry {
    shards: Vec<RwLock<HashMap<i64, Arc<Mutex<BitFilter>>>>>,
    default_size_bits: usize,
}

impl FilterRegistry {
    /// Create an empty registry. `default_size_bits` is used whenever a
    /// filter is created lazily by `check_and_mark`.
    pub fn new(default_size_bits: usize) -> Self {
        assert!(default_size_bits > 0, "filter size must be positive");
        Self {
            shards: (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect(),
            default_size_bits,
        }
    }

    fn shard(&self, user_key: i64) -> &RwLock<HashMap<i64, Arc<Mutex<BitFilter>>>> {
        &self.shards[(user_key as u64 % SHARD_COUNT as u64) as usize]
    }

    fn get(&self, user_key: i64) -> Option<Arc<Mutex<BitFilter>>> {
        self.shard(user_key)
            .read()
            .expect("filter shard lock poisoned")
            .get(&user_key)
            .cloned()
    }

    fn get_or_create(&self, user_key: i64, size_bits: usize) -> Arc<Mutex<BitFilter>> {
        let mut shard = self.shard(user_key).write().expect("filter shard lock poisoned");
        shard
            .entry(user_key)
            .or_insert_with(|| Arc::new(Mutex::new(BitFilter::new(size_bits))))
            .clone()
    }

    /// Allocate a zero-filled filter of `size_bits` bits for the user.
    ///
    /// If the user already has a filter this is a no-op; the existing filter
    /// keeps its original size and contents.
    pub fn create(&self, user_key: i64, size_bits: usize) {
        self.get_or_create(user_key, size_bits);
    }

    /// Mark an item as seen for the user.
    ///
    /// This path does not create filters: a missing entry is a lifecycle
    /// error surfaced as `FilterNotFound`.
    pub fn add(&self, item: &str, user_key: i64) -> Result<(), FilterError> {
        let filter = self.get(user_key).ok_or(FilterError::FilterNotFound(user_key))?;
        filter.lock().expect("filter lock poisoned").insert(item);
        Ok(())
    }

    /// Answer "has this item already been shown to this user", recording
    /// exposure as a side effect of the first check.
    ///
    /// Returns `true` if the item's bit was already set (probable prior
    /// exposure, no mutation). Returns `false` if it was not, in which case
    /// the bit is set before returning, so the next check for the same item
    /// answers `true`. A user with no filter gets one lazily at the default
    /// size; asking a membership question is never an error.
    pub fn check_and_mark(&self, item: &str, user_key: i64) -> bool {
        let filter = self.get_or_create(user_key, self.default_size_bits);
        let already_seen = filter
            .lock()
            .expect("filter lock poisoned")
            .check_and_insert(item);
        if already_seen {
            tracing::trace!("filter hit: item {} already shown to user {}", item, user_key);
        }
        already_seen
    }

    /// Number of users currently holding a filter.
    pub fn user_count(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.read().expect("filter shard lock poisoned").len())
            .sum()
    }
}

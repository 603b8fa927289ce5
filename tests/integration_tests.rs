// Integration tests for Ember Core
//
// The coordination core is exercised end-to-end against in-memory stands-ins
// for the four external collaborators: the scripted pair store, the match
// store, the geo-search backend, and the reserve cache.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ember_core::core::feed::{CandidateSource, FeedError, FeedService, ReserveCache};
use ember_core::core::pairing::canonical_pair;
use ember_core::core::registry::FilterRegistry;
use ember_core::core::swipes::{MatchStore, SwipeCoordinator, SwipeError, SwipePairStore};
use ember_core::models::{CandidateProfile, MatchOutcome, SwipeDirection, SwipeEvent};

/// Pair store with the same guarantee as the server-side script: the
/// write-then-read for one call happens under a single lock acquisition.
#[derive(Default)]
struct MemoryPairStore {
    hashes: Mutex<HashMap<String, HashMap<String, SwipeDirection>>>,
}

#[async_trait]
impl SwipePairStore for MemoryPairStore {
    async fn swipe_and_read(
        &self,
        pair_key: &str,
        own_field: &str,
        direction: SwipeDirection,
        counterpart_field: &str,
    ) -> Result<Option<SwipeDirection>, SwipeError> {
        let mut hashes = self.hashes.lock().unwrap();
        let fields = hashes.entry(pair_key.to_string()).or_default();
        fields.insert(own_field.to_string(), direction);
        Ok(fields.get(counterpart_field).copied())
    }
}

/// Match store enforcing the canonical-pair unique constraint.
#[derive(Default)]
struct MemoryMatchStore {
    matches: Mutex<Vec<(i64, i64)>>,
    swipe_log: Mutex<Vec<(i64, i64, SwipeDirection)>>,
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn create_match(&self, user_a: i64, user_b: i64) -> Result<MatchOutcome, SwipeError> {
        let pair = canonical_pair(user_a, user_b);
        let mut matches = self.matches.lock().unwrap();
        if matches.contains(&pair) {
            return Ok(MatchOutcome::Duplicate);
        }
        matches.push(pair);
        Ok(MatchOutcome::Created)
    }

    async fn insert_swipe(
        &self,
        user: i64,
        target: i64,
        direction: SwipeDirection,
    ) -> Result<(), SwipeError> {
        self.swipe_log.lock().unwrap().push((user, target, direction));
        Ok(())
    }
}

struct MemorySource {
    candidates: Mutex<Vec<CandidateProfile>>,
    calls: Mutex<usize>,
}

impl MemorySource {
    fn new(candidates: Vec<CandidateProfile>) -> Self {
        Self { candidates: Mutex::new(candidates), calls: Mutex::new(0) }
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CandidateSource for MemorySource {
    async fn retrieve_candidates(
        &self,
        _latitude: f64,
        _longitude: f64,
        _radius_km: f64,
    ) -> Result<Vec<CandidateProfile>, FeedError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.candidates.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct MemoryReserveCache {
    entries: Mutex<HashMap<i64, Vec<CandidateProfile>>>,
}

#[async_trait]
impl ReserveCache for MemoryReserveCache {
    async fn take(&self, user_key: i64) -> Result<Option<Vec<CandidateProfile>>, FeedError> {
        Ok(self.entries.lock().unwrap().remove(&user_key))
    }

    async fn put(
        &self,
        user_key: i64,
        candidates: &[CandidateProfile],
        _ttl: Duration,
    ) -> Result<(), FeedError> {
        self.entries.lock().unwrap().insert(user_key, candidates.to_vec());
        Ok(())
    }
}

fn create_candidate(id: i64, lat: f64, lon: f64) -> CandidateProfile {
    CandidateProfile {
        user_id: id,
        first_name: format!("User{}", id),
        last_name: "Test".to_string(),
        bio: "hello".to_string(),
        latitude: lat,
        longitude: lon,
        updated_at: chrono::Utc::now(),
    }
}

fn create_coordinator() -> (SwipeCoordinator, Arc<MemoryMatchStore>) {
    let store = Arc::new(MemoryMatchStore::default());
    let coordinator = SwipeCoordinator::new(Arc::new(MemoryPairStore::default()), store.clone());
    (coordinator, store)
}

#[tokio::test]
async fn test_mutual_match_reported_exactly_once() {
    let (coordinator, store) = create_coordinator();

    let first = coordinator.record_swipe(1, 2, SwipeDirection::Right).await.unwrap();
    let second = coordinator.record_swipe(2, 1, SwipeDirection::Right).await.unwrap();

    assert!(!first.is_match());
    assert!(second.is_match());
    assert_eq!(*store.matches.lock().unwrap(), vec![(1, 2)]);
}

#[tokio::test]
async fn test_match_detection_is_commutative() {
    // Same pair, arrival order reversed.
    let (coordinator, store) = create_coordinator();

    let first = coordinator.record_swipe(2, 1, SwipeDirection::Right).await.unwrap();
    let second = coordinator.record_swipe(1, 2, SwipeDirection::Right).await.unwrap();

    assert!(!first.is_match());
    assert!(second.is_match());
    assert_eq!(store.matches.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_opposing_directions_never_match() {
    let (coordinator, store) = create_coordinator();

    coordinator.record_swipe(1, 2, SwipeDirection::Right).await.unwrap();
    let decision = coordinator.record_swipe(2, 1, SwipeDirection::Left).await.unwrap();

    assert!(!decision.is_match());
    assert!(store.matches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_resubmission_does_not_duplicate_match() {
    let (coordinator, store) = create_coordinator();

    coordinator.record_swipe(1, 2, SwipeDirection::Right).await.unwrap();
    coordinator.record_swipe(2, 1, SwipeDirection::Right).await.unwrap();
    coordinator.record_swipe(1, 2, SwipeDirection::Right).await.unwrap();
    coordinator.record_swipe(2, 1, SwipeDirection::Right).await.unwrap();

    assert_eq!(store.matches.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_mutual_swipes_single_match() {
    for _ in 0..50 {
        let store = Arc::new(MemoryMatchStore::default());
        let coordinator = Arc::new(SwipeCoordinator::new(
            Arc::new(MemoryPairStore::default()),
            store.clone(),
        ));

        let a = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.record_swipe(1, 2, SwipeDirection::Right).await })
        };
        let b = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.record_swipe(2, 1, SwipeDirection::Right).await })
        };

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();

        // The store linearizes the two write-then-read units, so at least
        // the later one observes the match, and dedup keeps the stored
        // result at exactly one row either way.
        assert!(first.is_match() || second.is_match());
        assert_eq!(store.matches.lock().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_batch_ingestion_never_matches() {
    let (coordinator, store) = create_coordinator();

    let batch: Vec<SwipeEvent> = (0..10)
        .map(|i| SwipeEvent {
            user_a: i,
            user_b: i + 100,
            direction: SwipeDirection::Right,
        })
        .chain((0..10).map(|i| SwipeEvent {
            user_a: i + 100,
            user_b: i,
            direction: SwipeDirection::Right,
        }))
        .collect();

    let accepted = coordinator.ingest_batch(&batch).await.unwrap();

    assert_eq!(accepted, 20);
    assert_eq!(store.swipe_log.lock().unwrap().len(), 20);
    assert!(store.matches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_feed_two_tranche_lifecycle() {
    let source = Arc::new(MemorySource::new(
        (1..=10).map(|i| create_candidate(i, 40.7, -74.0)).collect(),
    ));
    let cache = Arc::new(MemoryReserveCache::default());
    let feed = FeedService::new(
        source.clone(),
        cache.clone(),
        Arc::new(FilterRegistry::new(4096)),
        Duration::from_secs(3600),
    );

    // Miss: one search, 40% returned, 60% reserved.
    let first = feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();
    assert_eq!(first.len(), 4);
    assert_eq!(source.call_count(), 1);

    // Hit: the reserved six, consumed.
    let second = feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();
    assert_eq!(second.len(), 6);
    assert_eq!(source.call_count(), 1);

    // No overlap between the tranches, order preserved within each.
    let first_ids: Vec<i64> = first.iter().map(|c| c.user_id).collect();
    let second_ids: Vec<i64> = second.iter().map(|c| c.user_id).collect();
    assert_eq!(first_ids, vec![7, 8, 9, 10]);
    assert_eq!(second_ids, vec![1, 2, 3, 4, 5, 6]);

    // Reserve consumed: the next request searches again.
    feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn test_feed_excludes_self_and_already_seen() {
    let source = Arc::new(MemorySource::new(vec![
        create_candidate(50, 40.7, -74.0), // the requester
        create_candidate(1, 40.7, -74.0),
        create_candidate(2, 40.7, -74.0),
    ]));
    let filters = Arc::new(FilterRegistry::new(4096));
    filters.check_and_mark("1", 50);

    let feed = FeedService::new(
        source,
        Arc::new(MemoryReserveCache::default()),
        filters,
        Duration::from_secs(3600),
    );

    let immediate = feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();
    let reserved = feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();

    let mut ids: Vec<i64> = immediate.iter().chain(reserved.iter()).map(|c| c.user_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn test_feed_empty_search_is_not_an_error() {
    let source = Arc::new(MemorySource::new(vec![]));
    let cache = Arc::new(MemoryReserveCache::default());
    let feed = FeedService::new(
        source.clone(),
        cache.clone(),
        Arc::new(FilterRegistry::new(4096)),
        Duration::from_secs(3600),
    );

    let result = feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();
    assert!(result.is_empty());
    assert!(cache.entries.lock().unwrap().is_empty());

    // Treated as a miss next time around.
    feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn test_feed_exposure_carries_across_searches() {
    // Candidates shown from one search never reappear in a later one.
    let source = Arc::new(MemorySource::new(
        (1..=5).map(|i| create_candidate(i, 40.7, -74.0)).collect(),
    ));
    let feed = FeedService::new(
        source.clone(),
        Arc::new(MemoryReserveCache::default()),
        Arc::new(FilterRegistry::new(4096)),
        Duration::from_secs(3600),
    );

    let first = feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();
    let reserved = feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();
    assert_eq!(first.len() + reserved.len(), 5);

    // Same five candidates come back from search, but all are marked seen.
    let third = feed.fetch_feed(50, 40.7, -74.0, 25.0).await.unwrap();
    assert!(third.is_empty());
}

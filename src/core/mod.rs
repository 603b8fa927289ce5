// Core coordination exports
pub mod bitfilter;
pub mod feed;
pub mod pairing;
pub mod registry;
pub mod swipes;

pub use bitfilter::BitFilter;
pub use feed::{CandidateSource, FeedError, FeedService, ReserveCache, RESERVE_FRACTION};
pub use pairing::{canonical_pair, pair_key, swipe_field};
pub use registry::{FilterError, FilterRegistry};
pub use swipes::{MatchStore, SwipeCoordinator, SwipeError, SwipePairStore};

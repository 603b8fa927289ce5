// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CandidateProfile, MatchDecision, MatchOutcome, SwipeDirection, SwipeEvent};
pub use requests::{CreateMatchRequest, CreateUserRequest, FeedQuery, RecordSwipeRequest};
pub use responses::{
    CreateMatchResponse, CreateUserResponse, ErrorResponse, FeedResponse, HealthResponse,
    SwipeBatchResponse, SwipeResponse,
};

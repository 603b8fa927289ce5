use serde::{Deserialize, Serialize};
use crate::models::domain::CandidateProfile;

/// Response for the atomic swipe endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeResponse {
    pub matched: bool,
}

/// Response for the batch swipe endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeBatchResponse {
    pub accepted: usize,
}

/// Response for the feed endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub candidates: Vec<CandidateProfile>,
    pub count: usize,
}

/// Response for user creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// Response for direct match creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchResponse {
    pub success: bool,
    pub duplicate: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

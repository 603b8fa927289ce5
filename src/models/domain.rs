use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Right,
    Left,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Right => "right",
            SwipeDirection::Left => "left",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwipeDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "right" => Ok(SwipeDirection::Right),
            "left" => Ok(SwipeDirection::Left),
            other => Err(format!("swipe direction must be right or left, got {:?}", other)),
        }
    }
}

/// One swipe event: `user_a` swiped on `user_b`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeEvent {
    pub user_a: i64,
    pub user_b: i64,
    pub direction: SwipeDirection,
}

/// Outcome of recording a swipe. Derived, never stored: a pair matches iff
/// the just-written direction is right and the counterpart field reads right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    Matched,
    NotMatched,
}

impl MatchDecision {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchDecision::Matched)
    }
}

/// Outcome of a match-creation call against the match store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Created,
    /// The canonical pair already had a match; benign, treated as success.
    Duplicate,
}

/// Candidate profile as served by the geo-search backend and returned in
/// feeds. Immutable from this service's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

//! Ember Core - swipe coordination and feed caching service for the Ember dating app
//!
//! This library provides the coordination core used by the Ember backend:
//! atomic mutual-match detection for swipes, per-user probabilistic
//! seen-filters, and the two-tranche feed cache in front of the geo-search
//! backend.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    pairing::{canonical_pair, pair_key, swipe_field},
    BitFilter, FeedService, FilterRegistry, SwipeCoordinator,
};
pub use models::{CandidateProfile, MatchDecision, SwipeDirection, SwipeEvent};

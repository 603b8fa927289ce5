// Route exports
pub mod health;
pub mod matches;
pub mod swipes;
pub mod users;

use actix_web::web;
use std::sync::Arc;

use crate::core::{FeedService, FilterRegistry, SwipeCoordinator};
use crate::services::PostgresClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SwipeCoordinator>,
    pub feed: Arc<FeedService>,
    pub filters: Arc<FilterRegistry>,
    pub postgres: Arc<PostgresClient>,
    /// Bit-array length for filters created on user registration.
    pub filter_size_bits: usize,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health::health_check))
            .configure(users::configure)
            .configure(swipes::configure)
            .configure(matches::configure),
    );
}

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::feed::FeedError;
use crate::models::{
    CreateUserRequest, CreateUserResponse, ErrorResponse, FeedQuery, FeedResponse,
};
use crate::routes::AppState;

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::post().to(create_user))
        .route("/users/feed", web::get().to(fetch_feed));
}

/// Create a user profile
///
/// POST /api/v1/users
///
/// Inserts the profile and eagerly allocates the user's seen-filter so the
/// first feed request starts from a clean exposure record.
async fn create_user(
    state: web::Data<AppState>,
    req: web::Json<CreateUserRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .postgres
        .insert_user(&req.first_name, &req.last_name, &req.bio, req.latitude, req.longitude)
        .await
    {
        Ok(user_id) => {
            state.filters.create(user_id, state.filter_size_bits);
            tracing::info!("created user {} with a {}-bit seen-filter", user_id, state.filter_size_bits);
            HttpResponse::Ok().json(CreateUserResponse { user_id })
        }
        Err(e) => {
            tracing::error!("failed to create user: {}", e);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "store_unavailable".to_string(),
                message: e.to_string(),
                status_code: 503,
            })
        }
    }
}

/// Fetch the user's next feed page
///
/// GET /api/v1/users/feed?userId={id}&latitude={lat}&longitude={lon}&radiusKm={km}
async fn fetch_feed(state: web::Data<AppState>, query: web::Query<FeedQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for feed request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .feed
        .fetch_feed(query.user_id, query.latitude, query.longitude, query.radius_km)
        .await
    {
        Ok(candidates) => HttpResponse::Ok().json(FeedResponse {
            count: candidates.len(),
            candidates,
        }),
        Err(FeedError::InvalidArgument(message)) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_feed_request".to_string(),
                message,
                status_code: 400,
            })
        }
        Err(FeedError::SearchUnavailable(message)) => {
            tracing::error!("search failure serving feed for {}: {}", query.user_id, message);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "search_unavailable".to_string(),
                message,
                status_code: 503,
            })
        }
        Err(FeedError::CacheUnavailable(message)) => {
            tracing::error!("cache failure serving feed for {}: {}", query.user_id, message);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "cache_unavailable".to_string(),
                message,
                status_code: 503,
            })
        }
    }
}

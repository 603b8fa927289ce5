use actix_web::{web, HttpResponse, Responder};

use crate::core::swipes::SwipeError;
use crate::models::{
    ErrorResponse, RecordSwipeRequest, SwipeBatchResponse, SwipeDirection, SwipeEvent,
    SwipeResponse,
};
use crate::routes::AppState;

/// Configure swipe routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/swipes", web::post().to(create_swipes))
        .route("/swipes/atomic", web::post().to(atomic_swipe));
}

fn swipe_error_response(err: SwipeError) -> HttpResponse {
    match err {
        SwipeError::InvalidArgument(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_swipe".to_string(),
            message,
            status_code: 400,
        }),
        SwipeError::StoreUnavailable(message) => {
            tracing::error!("swipe store failure: {}", message);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "store_unavailable".to_string(),
                message,
                status_code: 503,
            })
        }
    }
}

/// Record one swipe and resolve the match decision
///
/// POST /api/v1/swipes/atomic
///
/// Request body:
/// ```json
/// {
///   "userA": 3,
///   "userB": 17,
///   "direction": "right|left"
/// }
/// ```
async fn atomic_swipe(
    state: web::Data<AppState>,
    req: web::Json<RecordSwipeRequest>,
) -> impl Responder {
    let direction = match req.direction.parse::<SwipeDirection>() {
        Ok(direction) => direction,
        Err(message) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_swipe".to_string(),
                message,
                status_code: 400,
            });
        }
    };

    match state.coordinator.record_swipe(req.user_a, req.user_b, direction).await {
        Ok(decision) => HttpResponse::Ok().json(SwipeResponse { matched: decision.is_match() }),
        Err(err) => swipe_error_response(err),
    }
}

/// Bulk swipe ingestion for offline/backfill use
///
/// POST /api/v1/swipes
///
/// Request body: a JSON array of swipe tuples. The batch is appended to the
/// durable swipe log and never triggers match creation.
async fn create_swipes(
    state: web::Data<AppState>,
    req: web::Json<Vec<RecordSwipeRequest>>,
) -> impl Responder {
    let mut events = Vec::with_capacity(req.len());
    for item in req.iter() {
        match item.direction.parse::<SwipeDirection>() {
            Ok(direction) => events.push(SwipeEvent {
                user_a: item.user_a,
                user_b: item.user_b,
                direction,
            }),
            Err(message) => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "invalid_swipe".to_string(),
                    message,
                    status_code: 400,
                });
            }
        }
    }

    match state.coordinator.ingest_batch(&events).await {
        Ok(accepted) => HttpResponse::Ok().json(SwipeBatchResponse { accepted }),
        Err(err) => swipe_error_response(err),
    }
}

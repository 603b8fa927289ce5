use actix_web::{web, HttpResponse, Responder};

use crate::core::swipes::MatchStore;
use crate::models::{CreateMatchRequest, CreateMatchResponse, ErrorResponse, MatchOutcome};
use crate::routes::AppState;

/// Configure match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches", web::post().to(create_match));
}

/// Create a match directly
///
/// POST /api/v1/matches
///
/// Idempotent by canonical pair: a duplicate is reported in the response,
/// not treated as an error.
async fn create_match(
    state: web::Data<AppState>,
    req: web::Json<CreateMatchRequest>,
) -> impl Responder {
    if req.user_a == req.user_b {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_match".to_string(),
            message: format!("user {} cannot match with themselves", req.user_a),
            status_code: 400,
        });
    }

    match state.postgres.create_match(req.user_a, req.user_b).await {
        Ok(outcome) => HttpResponse::Ok().json(CreateMatchResponse {
            success: true,
            duplicate: outcome == MatchOutcome::Duplicate,
        }),
        Err(e) => {
            tracing::error!("failed to create match: {}", e);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "store_unavailable".to_string(),
                message: e.to_string(),
                status_code: 503,
            })
        }
    }
}

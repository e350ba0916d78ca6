use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::AuthUser;
use crate::core::{build_filter, SwipeBackend};
use crate::error::AppError;
use crate::models::CandidateSearchRequest;
use crate::routes::AppState;

/// Configure candidate discovery routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/candidates/search", web::post().to(search_candidates));
}

/// Resolve the candidate pool for the acting user
///
/// POST /api/v1/candidates/search
///
/// Request body:
/// ```json
/// {
///   "gender": "female",
///   "min_age": 25,
///   "max_age": 35,
///   "tags": ["hiking"]
/// }
/// ```
///
/// Returns the filtered, exclusion-applied pool in a deterministic order.
/// An empty list is a normal outcome, not an error.
async fn search_candidates(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CandidateSearchRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let filter = build_filter(&req)?;

    let candidates = state.store.resolve(user.id, &filter).await?;

    tracing::debug!(
        "Resolved {} candidates for user {}",
        candidates.len(),
        user.id
    );

    Ok(HttpResponse::Ok().json(candidates))
}

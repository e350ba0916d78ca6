use actix_web::{web, HttpResponse};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{MatchResponse, SwipeHistoryEntry, SwipeRequest, SwipeResponse};
use crate::routes::AppState;

/// Configure swipe routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/swipes/matches", web::get().to(get_matches))
        .route("/swipes/{candidate_id}", web::post().to(swipe))
        .route("/swipes", web::get().to(get_swipe_history));
}

/// Record a swipe decision on a candidate
///
/// POST /api/v1/swipes/{candidate_id}
///
/// Request body:
/// ```json
/// { "direction": "left" | "right" }
/// ```
///
/// Fails with 409 on a repeated swipe for the same candidate and 404 when
/// the candidate does not exist (or is the actor). On a mutual right-swipe
/// the response carries `match_formed: true` and both sides gain a pending
/// matchmaker record.
async fn swipe(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i32>,
    req: web::Json<SwipeRequest>,
) -> Result<HttpResponse, AppError> {
    let candidate_id = path.into_inner();

    let outcome = state
        .store
        .record_swipe(user.id, candidate_id, req.direction)
        .await?;

    if outcome.match_formed {
        // New pipeline entries exist for both sides
        state.cache.invalidate_pipeline(user.id).await;
        state.cache.invalidate_pipeline(candidate_id).await;
    }

    let candidate = state.store.get_user(candidate_id).await?.to_candidate();

    Ok(HttpResponse::Created().json(SwipeResponse {
        swipe: outcome.swipe,
        match_formed: outcome.match_formed,
        candidate,
    }))
}

/// The acting user's swipe history, most recent first
///
/// GET /api/v1/swipes
async fn get_swipe_history(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let history = state.store.swipe_history(user.id).await?;

    let entries: Vec<SwipeHistoryEntry> = history
        .into_iter()
        .map(|(swipe, candidate)| SwipeHistoryEntry { swipe, candidate })
        .collect();

    Ok(HttpResponse::Ok().json(entries))
}

/// The acting user's mutual matches, most recent first
///
/// GET /api/v1/swipes/matches
async fn get_matches(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let matches = state.store.matches_for(user.id).await?;

    let responses: Vec<MatchResponse> = matches
        .into_iter()
        .map(|(m, counterpart)| MatchResponse {
            id: m.id,
            matched_at: m.matched_at,
            counterpart,
        })
        .collect();

    Ok(HttpResponse::Ok().json(responses))
}

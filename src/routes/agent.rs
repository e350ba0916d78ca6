use actix_web::{web, HttpResponse};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{AgentProfile, MatchmakerResponse};
use crate::routes::AppState;
use crate::services::CacheKey;

/// Configure agent/matchmaker pipeline routes (read path; all status
/// transitions happen in the external outreach process)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/agent/me", web::get().to(get_my_agent))
        .route("/matchmaker", web::get().to(get_matchmaker_records));
}

/// The acting user's agent profile
///
/// GET /api/v1/agent/me
async fn get_my_agent(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let cache_key = CacheKey::agent(user.id);

    if let Ok(profile) = state.cache.get::<AgentProfile>(&cache_key).await {
        return Ok(HttpResponse::Ok().json(profile));
    }

    let profile = state.store.agent_profile(user.id).await?;

    if let Err(e) = state.cache.set(&cache_key, &profile).await {
        tracing::warn!("Failed to cache agent profile: {}", e);
    }

    Ok(HttpResponse::Ok().json(profile))
}

/// The acting user's matchmaker records, most recent first, joined with
/// each target's display fields
///
/// GET /api/v1/matchmaker
async fn get_matchmaker_records(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let cache_key = CacheKey::matchmaker(user.id);

    if let Ok(records) = state.cache.get::<Vec<MatchmakerResponse>>(&cache_key).await {
        return Ok(HttpResponse::Ok().json(records));
    }

    // Surfacing requires an agent profile, mirroring account provisioning
    let _ = state.store.agent_profile(user.id).await?;

    let records = state.store.matchmaker_records_for(user.id).await?;

    let responses: Vec<MatchmakerResponse> = records
        .into_iter()
        .map(|(record, target)| MatchmakerResponse { record, target })
        .collect();

    if let Err(e) = state.cache.set(&cache_key, &responses).await {
        tracing::warn!("Failed to cache matchmaker records: {}", e);
    }

    Ok(HttpResponse::Ok().json(responses))
}

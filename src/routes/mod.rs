// Route exports
pub mod agent;
pub mod auth;
pub mod candidates;
pub mod swipes;
pub mod users;

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};

use crate::auth::AuthContext;
use crate::models::HealthResponse;
use crate::services::{CacheManager, PgStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PgStore>,
    pub cache: Arc<CacheManager>,
    pub auth: AuthContext,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(auth::configure)
            .configure(candidates::configure)
            .configure(swipes::configure)
            .configure(agent::configure)
            .configure(users::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use crate::models::HealthResponse;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}

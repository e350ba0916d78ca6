use actix_cors::Cors;
use actix_web::{error as actix_error, middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

use kindred::auth::AuthContext;
use kindred::config::Settings;
use kindred::error::AppError;
use kindred::routes::{self, AppState};
use kindred::services::{CacheManager, PgStore};

/// Handle JSON payload errors (malformed bodies, non-integer ages, unknown
/// enum values) with the crate's error shape
fn handle_json_payload_error(
    err: actix_error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    AppError::Validation(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
fn handle_query_payload_error(
    err: actix_error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::Validation(format!("Invalid query: {}", err)).into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting kindred matchmaking service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize PostgreSQL store (runs migrations)
    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let store = Arc::new(
        PgStore::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            Some(db_min_conn),
        )
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            panic!("PostgreSQL connection error: {}", e);
        }),
    );

    info!("PostgreSQL store initialized (max: {} connections)", db_max_conn);

    // Initialize the in-process cache
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let cache_capacity = settings.cache.capacity.unwrap_or(1000);
    let cache = Arc::new(CacheManager::new(cache_capacity, cache_ttl));

    info!(
        "Cache initialized ({} entries, TTL: {}s)",
        cache_capacity, cache_ttl
    );

    // Bearer credential context
    let auth = AuthContext::new(settings.auth.secret.clone(), settings.auth.token_ttl_hours);

    // Build application state
    let app_state = AppState { store, cache, auth };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::{generate_salt, hash_password, verify_password};
use crate::error::AppError;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use crate::routes::AppState;

/// Configure authentication routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login));
}

/// Register a new account
///
/// POST /api/v1/auth/register
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let salt = generate_salt();
    let digest = hash_password(&req.password, &salt);

    let user = state
        .store
        .create_user(&req.email, &digest, &salt, &req.name, req.gender, req.age)
        .await?;

    tracing::info!("New registration: user {}", user.id);

    Ok(HttpResponse::Created().json(UserResponse::from_parts(user, vec![])))
}

/// Exchange credentials for a bearer token
///
/// POST /api/v1/auth/login
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.store.find_user_by_email(&req.email).await?;

    // Same failure for unknown email and wrong password
    let user = user.ok_or_else(invalid_credentials)?;
    if !verify_password(&req.password, &user.password_salt, &user.password_digest) {
        return Err(invalid_credentials());
    }

    let token = state.auth.issue(user.id)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}

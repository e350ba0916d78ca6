use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::routes::AppState;

/// JWT claims carried by the bearer credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Acting user id
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Issues and validates bearer credentials for core operations.
#[derive(Clone)]
pub struct AuthContext {
    secret: String,
    token_ttl_hours: i64,
}

impl AuthContext {
    pub fn new(secret: String, token_ttl_hours: i64) -> Self {
        Self {
            secret,
            token_ttl_hours,
        }
    }

    /// Issue a signed token identifying `user_id`.
    pub fn issue(&self, user_id: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_ttl_hours)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Unauthorized(format!("Failed to issue token: {}", e)))
    }

    /// Validate a token and return the acting user id.
    ///
    /// Expired or malformed tokens fail here; expiry is checked by the
    /// default validation.
    pub fn verify(&self, token: &str) -> Result<i32, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        data.claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

/// Generate a fresh random salt for a new credential.
pub fn generate_salt() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Salted SHA-256 digest of a password, hex-encoded.
pub fn hash_password(plain: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a password attempt against the stored digest.
pub fn verify_password(plain: &str, salt: &str, digest: &str) -> bool {
    hash_password(plain, salt) == digest
}

/// The authenticated acting user, extracted from `Authorization: Bearer`.
///
/// Absence or invalidity of the credential rejects the request with 401
/// before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i32,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer credential".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Malformed Authorization header".to_string()))?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Unauthorized("Authentication not configured".to_string()))?;

    let id = state.auth.verify(token)?;
    Ok(AuthUser { id })
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Gender, SwipeDirection};

/// Request to register a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub gender: Gender,
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: i32,
}

/// Request to log in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Raw candidate search criteria, normalized by the filter model before use
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CandidateSearchRequest {
    pub gender: Option<Gender>,
    #[validate(range(min = 18, max = 100, message = "Age filter must be between 18 and 100"))]
    pub min_age: Option<i32>,
    #[validate(range(min = 18, max = 100, message = "Age filter must be between 18 and 100"))]
    pub max_age: Option<i32>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Body of a swipe decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeRequest {
    pub direction: SwipeDirection,
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    /// Comma-separated interest tags, normalized on write.
    #[validate(length(max = 500))]
    pub tags: Option<String>,
}

/// Request to attach a photo by URL (binary upload is handled externally)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddPhotoRequest {
    #[validate(length(min = 1, max = 500))]
    pub url: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Candidate, Gender, MatchmakerRecord, Photo, Swipe, User};

/// Bearer credential issued by login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Account as returned to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub tags: Vec<String>,
    pub photos: Vec<Photo>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    /// Assemble the owner-facing view from a user and their photo list.
    pub fn from_parts(user: User, photos: Vec<Photo>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            gender: user.gender,
            age: user.age,
            location: user.location,
            bio: user.bio,
            tags: user.tags,
            photos,
            created_at: user.created_at,
        }
    }
}

/// Response for a recorded swipe decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeResponse {
    #[serde(flatten)]
    pub swipe: Swipe,
    pub match_formed: bool,
    pub candidate: Candidate,
}

/// One row of the swipe history, joined with the candidate summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeHistoryEntry {
    #[serde(flatten)]
    pub swipe: Swipe,
    pub candidate: Candidate,
}

/// A mutual match joined with the other side's summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub id: i32,
    pub matched_at: DateTime<Utc>,
    pub counterpart: Candidate,
}

/// A matchmaker record joined with the target's summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchmakerResponse {
    #[serde(flatten)]
    pub record: MatchmakerRecord,
    pub target: Candidate,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Swipe decision direction: left = pass, right = like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "swipe_direction", rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Lifecycle state of a user's agent profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "agent_status", rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Inactive,
}

/// Outreach status of a matchmaker record. Transitions are driven by the
/// external outreach process; this core only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "matchmaker_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchmakerStatus {
    Pending,
    Contacted,
    Matched,
    Rejected,
}

/// A registered account, including credential material.
///
/// Only the storage layer sees this shape; everything crossing the HTTP
/// boundary goes through the response DTOs or [`Candidate`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_digest: String,
    pub password_salt: String,
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    pub location: Option<String>,
    pub bio: Option<String>,
    /// Interest tags, normalized from the comma-separated storage form.
    pub tags: Vec<String>,
    /// First photo by display order, if any.
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Project this user into its discovery shape (credentials dropped).
    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            id: self.id,
            name: self.name.clone(),
            gender: self.gender,
            age: self.age,
            location: self.location.clone(),
            bio: self.bio.clone(),
            tags: self.tags.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// A user as shown in discovery: same display fields, no credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub tags: Vec<String>,
    pub photo_url: Option<String>,
}

/// A single uploaded photo reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: i32,
    pub url: String,
    pub display_order: i32,
}

/// Search criteria for the candidate pool, already normalized and validated.
///
/// `None` fields impose no constraint; `tags` is never an empty vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwipeFilter {
    pub gender: Option<Gender>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub tags: Option<Vec<String>>,
}

/// An immutable swipe decision, one per (actor, candidate) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swipe {
    pub id: i32,
    pub actor_id: i32,
    pub candidate_id: i32,
    pub direction: SwipeDirection,
    pub swiped_at: DateTime<Utc>,
}

/// A mutual like, identified by the unordered user pair (stored ordered).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: i32,
    pub user_lo: i32,
    pub user_hi: i32,
    pub matched_at: DateTime<Utc>,
}

impl Match {
    /// The other side of the pair from `user_id`'s perspective.
    pub fn counterpart(&self, user_id: i32) -> i32 {
        if self.user_lo == user_id {
            self.user_hi
        } else {
            self.user_lo
        }
    }
}

/// Per-user outreach tracking entry, created when a match forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchmakerRecord {
    pub id: i32,
    pub owner_user_id: i32,
    pub target_user_id: i32,
    pub status: MatchmakerStatus,
    pub contact_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Passive per-user record describing automated-outreach readiness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub status: AgentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of recording a swipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeOutcome {
    pub swipe: Swipe,
    pub match_formed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "a@example.com".to_string(),
            password_digest: "digest".to_string(),
            password_salt: "salt".to_string(),
            name: "Alice".to_string(),
            gender: Gender::Female,
            age: 27,
            location: Some("SF".to_string()),
            bio: None,
            tags: vec!["hiking".to_string()],
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_candidate_projection_keeps_display_fields() {
        let candidate = sample_user().to_candidate();
        assert_eq!(candidate.id, 7);
        assert_eq!(candidate.name, "Alice");
        assert_eq!(candidate.age, 27);
        assert_eq!(candidate.tags, vec!["hiking"]);
    }

    #[test]
    fn test_match_counterpart() {
        let m = Match {
            id: 1,
            user_lo: 3,
            user_hi: 9,
            matched_at: Utc::now(),
        };
        assert_eq!(m.counterpart(3), 9);
        assert_eq!(m.counterpart(9), 3);
    }

    #[test]
    fn test_direction_serialization() {
        assert_eq!(
            serde_json::to_string(&SwipeDirection::Left).unwrap(),
            "\"left\""
        );
        let parsed: SwipeDirection = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(parsed, SwipeDirection::Right);
    }
}

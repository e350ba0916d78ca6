// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgentProfile, AgentStatus, Candidate, Gender, Match, MatchmakerRecord, MatchmakerStatus,
    Photo, Swipe, SwipeDirection, SwipeFilter, SwipeOutcome, User,
};
pub use requests::{
    AddPhotoRequest, CandidateSearchRequest, LoginRequest, RegisterRequest, SwipeRequest,
    UpdateProfileRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, MatchResponse, MatchmakerResponse, SwipeHistoryEntry,
    SwipeResponse, TokenResponse, UserResponse,
};

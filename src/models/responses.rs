use crate::core::intake::FieldIssue;
use crate::models::domain::MatchResult;
use serde::{Deserialize, Serialize};

/// Response for the find matches endpoint
///
/// An empty `matches` list is a valid "no mentors currently match" outcome,
/// not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "snapshotRefreshedAt")]
    pub snapshot_refreshed_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "mentorCount")]
    pub mentor_count: usize,
    #[serde(rename = "snapshotRefreshedAt")]
    pub snapshot_refreshed_at: chrono::DateTime<chrono::Utc>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Index refresh response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(rename = "mentorCount")]
    pub mentor_count: usize,
    #[serde(rename = "refreshedAt")]
    pub refreshed_at: chrono::DateTime<chrono::Utc>,
}

/// Generic error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Validation failure carrying every offending intake field
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub issues: Vec<FieldIssue>,
    pub status_code: u16,
}

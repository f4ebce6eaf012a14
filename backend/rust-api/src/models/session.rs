use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::submission::ProblemPhase;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Opaque, already-authenticated team identifier.
    #[validate(length(min = 1, message = "team_id must not be empty"))]
    pub team_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub team_id: String,
    pub started_at: DateTime<Utc>,
    pub problems: Vec<ProblemSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub team_id: String,
    pub started_at: DateTime<Utc>,
}

/// Entry in the problem list: the title carries the progress marker
/// ("✅ " cleared, "❌ " failed) exactly as the front-end renders tabs.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProblemSummary {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProblemView {
    pub id: String,
    pub title: String,
    pub statement: String,
    pub phase: ProblemPhase,
    pub is_clear: bool,
    pub is_failed: bool,
    pub max_attempts: u32,
    pub attempts_used: u32,
    pub attempts_remaining: u32,
    /// Fixed status notice shown instead of the answer form once the
    /// problem is terminal for this session.
    pub notice: Option<String>,
}

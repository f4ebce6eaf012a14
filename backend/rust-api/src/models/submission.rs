use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One graded attempt, exactly as it lands in the durable submission log.
/// Rows are append-only: grading history is permanent and never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub team_id: String,
    pub problem_id: String,
    pub timestamp: DateTime<Utc>,
    pub is_clear: bool,
    pub key: String,
    pub max_attempts: u32,
}

/// Derived per (team, problem) status, cached in the session context.
/// `is_clear` mirrors the durable log after reconciliation; `is_failed`
/// is computed from the session-local attempt counter only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressStatus {
    pub is_clear: bool,
    pub is_failed: bool,
}

/// Where a (team, problem) pair sits within the current session.
///
/// `Cleared` is durable across sessions; `Exhausted` is sticky only within
/// the session, since the attempt counter resets on a fresh session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProblemPhase {
    Unattempted,
    InProgress,
    Cleared,
    Exhausted,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, message = "answer must not be empty"))]
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub is_clear: bool,
    pub is_failed: bool,
    pub attempts_used: u32,
    pub attempts_remaining: u32,
    /// True when this submission flipped cleared/failed status. The caller
    /// should re-fetch the view state instead of trusting what it rendered.
    pub state_changed: bool,
    pub feedback: String,
}

use serde::{Deserialize, Serialize};

pub mod session;
pub mod submission;

pub use session::{
    CreateSessionRequest, CreateSessionResponse, ProblemSummary, ProblemView, SessionSummary,
};
pub use submission::{
    ProblemPhase, ProgressStatus, Submission, SubmitAnswerRequest, SubmitAnswerResponse,
};

/// One quiz problem as served to a team. Content is fixed per problem;
/// the answer key never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub statement: String,
    #[serde(skip_serializing)]
    pub answer: String,
    pub max_attempts: u32,
}

impl Problem {
    /// Grading is trimmed exact-match against the answer key.
    pub fn grade(&self, answer: &str) -> bool {
        answer.trim() == self.answer.trim()
    }
}

//! Durable submission log port.
//!
//! The log is the single source of truth for cleared status. The contract is
//! deliberately narrow: append one immutable row, count rows under an
//! equality filter. No updates, no deletes.

use async_trait::async_trait;

use crate::models::Submission;

pub mod memory;
pub mod mongo;

pub use memory::MemorySubmissionStore;
pub use mongo::MongoSubmissionStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("submission log query failed: {0}")]
    Query(String),

    #[error("submission log append failed: {0}")]
    Append(String),

    #[error("submission log operation timed out after {0}ms")]
    Timeout(u64),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Append exactly one row. Implementations must never overwrite or
    /// delete existing rows.
    async fn append(&self, row: &Submission) -> StoreResult<()>;

    /// Count rows matching equality on (team_id, problem_id, is_clear).
    async fn count_matching(
        &self,
        team_id: &str,
        problem_id: &str,
        is_clear: bool,
    ) -> StoreResult<u64>;

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

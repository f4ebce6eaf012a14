use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{StoreError, StoreResult, SubmissionStore};
use crate::models::Submission;

/// In-memory submission log for tests and local runs without MongoDB.
///
/// The failure flags let tests exercise the degraded paths: a failing read
/// must fall back to not-yet-cleared, a failing append must surface a
/// retryable error.
#[derive(Default)]
pub struct MemorySubmissionStore {
    rows: Mutex<Vec<Submission>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all appended rows, oldest first.
    pub fn rows(&self) -> Vec<Submission> {
        self.rows.lock().expect("submission log poisoned").clone()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().expect("submission log poisoned").len()
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn append(&self, row: &Submission) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Append("injected write failure".into()));
        }
        self.rows
            .lock()
            .expect("submission log poisoned")
            .push(row.clone());
        Ok(())
    }

    async fn count_matching(
        &self,
        team_id: &str,
        problem_id: &str,
        is_clear: bool,
    ) -> StoreResult<u64> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Query("injected read failure".into()));
        }
        let rows = self.rows.lock().expect("submission log poisoned");
        let count = rows
            .iter()
            .filter(|r| {
                r.team_id == team_id && r.problem_id == problem_id && r.is_clear == is_clear
            })
            .count();
        Ok(count as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Query("injected read failure".into()));
        }
        Ok(())
    }
}

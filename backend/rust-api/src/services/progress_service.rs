//! The attempt-limiting and clear/fail state machine.
//!
//! Per (team, problem) within one session:
//! `UNATTEMPTED -> IN_PROGRESS -> {CLEARED, EXHAUSTED}`. CLEARED is durable
//! across sessions via the submission log; EXHAUSTED lasts only as long as
//! the session, because the attempt counter is session-scoped.

use std::sync::Arc;

use chrono::Utc;

use crate::error::ApiError;
use crate::metrics::{
    record_cache_hit, record_cache_miss, CLEARS_TOTAL, LOCKOUTS_TOTAL, RECONCILE_FALLBACKS_TOTAL,
    SUBMISSIONS_RECORDED_TOTAL,
};
use crate::models::{
    Problem, ProblemPhase, ProblemView, ProgressStatus, Submission, SubmitAnswerResponse,
};
use crate::services::session_service::SessionContext;
use crate::store::SubmissionStore;
use crate::utils::retry::{retry_async_with_config, RetryConfig};

/// Attempt key for the main answer of every problem. Kept as a column so
/// that a problem can grow secondary budgets without a schema change.
pub const MAIN_ATTEMPT_KEY: &str = "main";

pub const CLEARED_NOTICE: &str = "You have already cleared this problem.";
pub const EXHAUSTED_NOTICE: &str =
    "The attempt limit for this problem is spent. No further answers are accepted.";

pub struct ProgressService {
    store: Arc<dyn SubmissionStore>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }

    /// Synchronize the session's status cache with the durable log.
    ///
    /// Runs a real query only on the first touch of a (team, problem) pair
    /// in this session; afterwards the cache answers. A failed query
    /// degrades to not-yet-cleared rather than blocking the caller, so a
    /// transient outage can at worst hide an old clear until reload.
    pub async fn reconcile(&self, ctx: &mut SessionContext, problem: &Problem) -> ProgressStatus {
        if ctx.is_reconciled(&problem.id) {
            record_cache_hit();
            return ctx.status(&problem.id);
        }
        record_cache_miss();

        let is_clear = match self
            .store
            .count_matching(&ctx.team_id, &problem.id, true)
            .await
        {
            Ok(count) => count > 0,
            Err(e) => {
                RECONCILE_FALLBACKS_TOTAL.inc();
                tracing::warn!(
                    "Reconcile query failed for team={} problem={}, defaulting to not cleared: {}",
                    ctx.team_id,
                    problem.id,
                    e
                );
                false
            }
        };

        ctx.fill_reconciled(&problem.id, &problem.title, is_clear);
        ctx.status(&problem.id)
    }

    /// Current view state for one problem, as the front-end re-renders it.
    pub async fn view(&self, ctx: &mut SessionContext, problem: &Problem) -> ProblemView {
        let status = self.reconcile(ctx, problem).await;
        let counter = ctx.counter(&problem.id, MAIN_ATTEMPT_KEY);
        let used = counter.map(|c| c.used()).unwrap_or(0);
        let remaining = counter
            .map(|c| c.remaining())
            .unwrap_or(problem.max_attempts);
        let exhausted = !status.is_clear && counter.map(|c| c.is_exhausted()).unwrap_or(false);

        let phase = if status.is_clear {
            ProblemPhase::Cleared
        } else if exhausted {
            ProblemPhase::Exhausted
        } else if used > 0 {
            ProblemPhase::InProgress
        } else {
            ProblemPhase::Unattempted
        };

        let notice = match phase {
            ProblemPhase::Cleared => Some(CLEARED_NOTICE.to_string()),
            ProblemPhase::Exhausted => Some(EXHAUSTED_NOTICE.to_string()),
            _ => None,
        };

        ProblemView {
            id: problem.id.clone(),
            title: ctx
                .title(&problem.id)
                .unwrap_or(problem.title.as_str())
                .to_string(),
            statement: problem.statement.clone(),
            phase,
            is_clear: status.is_clear,
            is_failed: status.is_failed,
            max_attempts: problem.max_attempts,
            attempts_used: used,
            attempts_remaining: remaining,
            notice,
        }
    }

    /// Grade one answer and record it.
    ///
    /// Order matters: terminal states are rejected before an attempt is
    /// consumed and before grading runs; the durable append happens before
    /// any cache transition so the log never lags the cache. An append that
    /// still fails after retries leaves the attempt consumed (the row may
    /// have landed; double credit is worse than a lost attempt) and surfaces
    /// a retryable error.
    pub async fn submit(
        &self,
        ctx: &mut SessionContext,
        problem: &Problem,
        answer: &str,
    ) -> Result<SubmitAnswerResponse, ApiError> {
        if ctx.team_id.is_empty() || problem.id.is_empty() {
            return Err(ApiError::InvalidInput(
                "team_id and problem_id must not be empty".to_string(),
            ));
        }

        let status = self.reconcile(ctx, problem).await;
        if status.is_clear {
            return Err(ApiError::AlreadyCleared);
        }

        {
            let counter = ctx.counter_mut(&problem.id, MAIN_ATTEMPT_KEY, problem.max_attempts);
            if counter.is_exhausted() {
                return Err(ApiError::AttemptsExhausted);
            }
            if !counter.check_attempt() {
                // Locked out between the pre-check and the consume; the
                // counter stays monotonic either way.
                return Err(ApiError::AttemptsExhausted);
            }
        }

        let correct = problem.grade(answer);

        let row = Submission {
            team_id: ctx.team_id.clone(),
            problem_id: problem.id.clone(),
            timestamp: Utc::now(),
            is_clear: correct,
            key: MAIN_ATTEMPT_KEY.to_string(),
            max_attempts: problem.max_attempts,
        };

        retry_async_with_config(RetryConfig::aggressive(), || async {
            self.store.append(&row).await
        })
        .await?;

        SUBMISSIONS_RECORDED_TOTAL
            .with_label_values(&[if correct { "true" } else { "false" }])
            .inc();

        let mut state_changed = false;
        if correct {
            if ctx.mark_cleared(&problem.id) {
                CLEARS_TOTAL.inc();
                state_changed = true;
                tracing::info!("Team {} cleared problem {}", ctx.team_id, problem.id);
            }
        } else {
            let exhausted = ctx
                .counter(&problem.id, MAIN_ATTEMPT_KEY)
                .map(|c| c.is_exhausted())
                .unwrap_or(false);
            if exhausted && !ctx.status(&problem.id).is_clear && ctx.mark_failed(&problem.id) {
                LOCKOUTS_TOTAL.inc();
                state_changed = true;
                tracing::info!(
                    "Team {} exhausted attempts on problem {}",
                    ctx.team_id,
                    problem.id
                );
            }
        }

        let status = ctx.status(&problem.id);
        let counter = ctx.counter(&problem.id, MAIN_ATTEMPT_KEY);

        Ok(SubmitAnswerResponse {
            correct,
            is_clear: status.is_clear,
            is_failed: status.is_failed,
            attempts_used: counter.map(|c| c.used()).unwrap_or(0),
            attempts_remaining: counter.map(|c| c.remaining()).unwrap_or(0),
            state_changed,
            feedback: if correct {
                "Correct!".to_string()
            } else {
                "Incorrect answer".to_string()
            },
        })
    }
}

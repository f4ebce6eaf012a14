use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::metrics::{SESSIONS_ACTIVE, SESSIONS_TOTAL};
use crate::models::{ProgressStatus, SessionSummary};

pub const CLEAR_MARKER: &str = "✅ ";
pub const FAILED_MARKER: &str = "❌ ";

/// Pure projection of progress status onto a display title. Cleared wins
/// over failed, since a clear can never be lost once recorded.
pub fn decorate_title(base_title: &str, status: ProgressStatus) -> String {
    if status.is_clear {
        format!("{}{}", CLEAR_MARKER, base_title)
    } else if status.is_failed {
        format!("{}{}", FAILED_MARKER, base_title)
    } else {
        base_title.to_string()
    }
}

/// Session-local attempt budget for one (problem, key) pair.
///
/// The count lives only in the session context, not in the durable log:
/// a fresh session starts back at zero even when cleared status is
/// reconciled from history. Saturating arithmetic keeps effectively
/// unlimited budgets safe.
#[derive(Debug, Clone, Copy)]
pub struct AttemptCounter {
    max_attempts: u32,
    used: u32,
}

impl AttemptCounter {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            used: 0,
        }
    }

    /// Consume one attempt. Returns whether the attempt is within budget.
    /// Once false, every later call is false as well.
    pub fn check_attempt(&mut self) -> bool {
        self.used = self.used.saturating_add(1);
        self.used <= self.max_attempts
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.used)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max_attempts
    }
}

/// All mutable per-session state, owned explicitly instead of living in
/// ambient globals: the status cache, the reconcile-once guard, the
/// attempt counters and the decorated title cache.
pub struct SessionContext {
    pub session_id: String,
    pub team_id: String,
    pub started_at: DateTime<Utc>,
    statuses: HashMap<String, ProgressStatus>,
    reconciled: HashSet<String>,
    counters: HashMap<(String, String), AttemptCounter>,
    titles: HashMap<String, String>,
}

impl SessionContext {
    pub fn new(team_id: &str) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            team_id: team_id.to_string(),
            started_at: Utc::now(),
            statuses: HashMap::new(),
            reconciled: HashSet::new(),
            counters: HashMap::new(),
            titles: HashMap::new(),
        }
    }

    pub fn status(&self, problem_id: &str) -> ProgressStatus {
        self.statuses.get(problem_id).copied().unwrap_or_default()
    }

    /// Whether the durable log has already been consulted for this problem
    /// in this session. Reconciliation happens at most once per pair.
    pub fn is_reconciled(&self, problem_id: &str) -> bool {
        self.reconciled.contains(problem_id)
    }

    /// Install the reconciled status and the decorated title in one step.
    pub fn fill_reconciled(&mut self, problem_id: &str, base_title: &str, is_clear: bool) {
        let status = ProgressStatus {
            is_clear,
            is_failed: false,
        };
        self.statuses.insert(problem_id.to_string(), status);
        self.reconciled.insert(problem_id.to_string());
        self.titles
            .insert(problem_id.to_string(), decorate_title(base_title, status));
    }

    /// Transition to cleared. Returns true only on the first call for this
    /// problem; the title marker is prepended exactly once.
    pub fn mark_cleared(&mut self, problem_id: &str) -> bool {
        let status = self.statuses.entry(problem_id.to_string()).or_default();
        if status.is_clear {
            return false;
        }
        status.is_clear = true;

        if let Some(title) = self.titles.get_mut(problem_id) {
            *title = format!("{}{}", CLEAR_MARKER, title);
        }
        true
    }

    /// Transition to failed. Idempotent like `mark_cleared`; a problem that
    /// is already cleared never becomes failed.
    pub fn mark_failed(&mut self, problem_id: &str) -> bool {
        let status = self.statuses.entry(problem_id.to_string()).or_default();
        if status.is_clear || status.is_failed {
            return false;
        }
        status.is_failed = true;

        if let Some(title) = self.titles.get_mut(problem_id) {
            *title = format!("{}{}", FAILED_MARKER, title);
        }
        true
    }

    pub fn title(&self, problem_id: &str) -> Option<&str> {
        self.titles.get(problem_id).map(String::as_str)
    }

    pub fn counter_mut(
        &mut self,
        problem_id: &str,
        key: &str,
        max_attempts: u32,
    ) -> &mut AttemptCounter {
        self.counters
            .entry((problem_id.to_string(), key.to_string()))
            .or_insert_with(|| AttemptCounter::new(max_attempts))
    }

    pub fn counter(&self, problem_id: &str, key: &str) -> Option<AttemptCounter> {
        self.counters
            .get(&(problem_id.to_string(), key.to_string()))
            .copied()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            team_id: self.team_id.clone(),
            started_at: self.started_at,
        }
    }
}

/// Process-local session registry. The durable log is the only shared
/// store; everything here dies with the process by design.
#[derive(Default)]
pub struct SessionService {
    sessions: Mutex<HashMap<String, SessionContext>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_session(&self, team_id: &str) -> SessionSummary {
        let ctx = SessionContext::new(team_id);
        let summary = ctx.summary();

        self.sessions
            .lock()
            .await
            .insert(ctx.session_id.clone(), ctx);

        SESSIONS_TOTAL.with_label_values(&["created"]).inc();
        SESSIONS_ACTIVE.inc();
        tracing::info!(
            "Session created: {} for team: {}",
            summary.session_id,
            summary.team_id
        );

        summary
    }

    pub async fn end_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().await.remove(session_id).is_some();
        if removed {
            SESSIONS_TOTAL.with_label_values(&["ended"]).inc();
            SESSIONS_ACTIVE.dec();
            tracing::info!("Session ended: {}", session_id);
        }
        removed
    }

    /// Lock the registry for one synchronous request pass.
    pub async fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionContext>> {
        self.sessions.lock().await
    }
}

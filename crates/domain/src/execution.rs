//! Execution — the bookkeeping record of one rule firing for one event.
//!
//! A record is created in `PENDING` state as soon as a rule matches
//! (before any action runs, so duplicate deliveries can be detected),
//! moves to `RUNNING` when its chain starts, and ends in one of the
//! three terminal outcomes once every action has been attempted.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, ExecutionId, RuleId};
use crate::time::Timestamp;

/// Lifecycle state of a rule execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Matched and recorded, chain not started yet.
    Pending,
    /// Chain in progress.
    Running,
    /// Every action succeeded.
    Success,
    /// Some actions succeeded, some failed.
    PartialFailure,
    /// Every action failed.
    Failure,
}

impl ExecutionStatus {
    /// Whether this status is a terminal outcome.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::PartialFailure | Self::Failure)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::PartialFailure => "PARTIAL_FAILURE",
            Self::Failure => "FAILURE",
        };
        f.write_str(s)
    }
}

/// Outcome of a single action within a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    Success,
    Failure,
}

/// Per-action result recorded in execution history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Action type name, e.g. `"SEND_EMAIL"`.
    pub action_type: String,
    pub status: ActionStatus,
    /// Failure detail when `status` is `Failure`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    /// A successful action result.
    #[must_use]
    pub fn success(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            status: ActionStatus::Success,
            error: None,
        }
    }

    /// A failed action result carrying the failure detail.
    #[must_use]
    pub fn failure(action_type: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            status: ActionStatus::Failure,
            error: Some(error.into()),
        }
    }
}

/// Compute the chain outcome from its per-action results.
///
/// All succeeded ⇒ `Success`; all failed ⇒ `Failure`; otherwise
/// `PartialFailure`. An empty slice counts as `Success` (vacuously),
/// though active rules always carry at least one action.
#[must_use]
pub fn outcome_of(results: &[ActionResult]) -> ExecutionStatus {
    let failed = results
        .iter()
        .filter(|r| r.status == ActionStatus::Failure)
        .count();
    if failed == 0 {
        ExecutionStatus::Success
    } else if failed == results.len() {
        ExecutionStatus::Failure
    } else {
        ExecutionStatus::PartialFailure
    }
}

/// Bookkeeping record for one `(event, rule)` execution attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: ExecutionId,
    pub rule_id: RuleId,
    /// Event that triggered this execution; `(event_id, rule_id)` is the
    /// dedup key guaranteeing at-most-once side effects per delivery.
    pub event_id: EventId,
    pub status: ExecutionStatus,
    pub started_at: Timestamp,
    /// Set when the chain reaches a terminal status.
    pub finished_at: Option<Timestamp>,
    /// One entry per attempted action, in chain order.
    pub action_results: Vec<ActionResult>,
}

impl ExecutionRecord {
    /// Create a fresh `PENDING` record stamped with the current time.
    #[must_use]
    pub fn pending(rule_id: RuleId, event_id: EventId) -> Self {
        Self {
            id: ExecutionId::new(),
            rule_id,
            event_id,
            status: ExecutionStatus::Pending,
            started_at: crate::time::now(),
            finished_at: None,
            action_results: Vec::new(),
        }
    }
}

//! Execution repository port — bookkeeping for rule executions.

use std::future::Future;
use std::sync::Arc;

use rulehub_domain::error::RuleHubError;
use rulehub_domain::execution::{ActionResult, ExecutionRecord, ExecutionStatus};
use rulehub_domain::id::{ExecutionId, RuleId};
use rulehub_domain::time::Timestamp;

/// Repository for persisting and querying [`ExecutionRecord`]s.
pub trait ExecutionRepository {
    /// Insert a `PENDING` record, enforcing the `(event_id, rule_id)`
    /// dedup key. Returns `false` (and stores nothing) when a record for
    /// that key already exists.
    fn insert_pending(
        &self,
        record: ExecutionRecord,
    ) -> impl Future<Output = Result<bool, RuleHubError>> + Send;

    /// Transition a record from `PENDING` to `RUNNING`.
    fn mark_running(
        &self,
        id: ExecutionId,
    ) -> impl Future<Output = Result<(), RuleHubError>> + Send;

    /// Store the terminal outcome and per-action results, returning the
    /// completed record.
    fn complete(
        &self,
        id: ExecutionId,
        status: ExecutionStatus,
        results: Vec<ActionResult>,
        finished_at: Timestamp,
    ) -> impl Future<Output = Result<ExecutionRecord, RuleHubError>> + Send;

    /// Get a record by its unique identifier.
    fn get_by_id(
        &self,
        id: ExecutionId,
    ) -> impl Future<Output = Result<Option<ExecutionRecord>, RuleHubError>> + Send;

    /// Page through a rule's executions, newest-first.
    fn find_by_rule(
        &self,
        rule_id: RuleId,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = Result<Vec<ExecutionRecord>, RuleHubError>> + Send;
}

impl<T: ExecutionRepository + Send + Sync> ExecutionRepository for Arc<T> {
    fn insert_pending(
        &self,
        record: ExecutionRecord,
    ) -> impl Future<Output = Result<bool, RuleHubError>> + Send {
        (**self).insert_pending(record)
    }

    fn mark_running(
        &self,
        id: ExecutionId,
    ) -> impl Future<Output = Result<(), RuleHubError>> + Send {
        (**self).mark_running(id)
    }

    fn complete(
        &self,
        id: ExecutionId,
        status: ExecutionStatus,
        results: Vec<ActionResult>,
        finished_at: Timestamp,
    ) -> impl Future<Output = Result<ExecutionRecord, RuleHubError>> + Send {
        (**self).complete(id, status, results, finished_at)
    }

    fn get_by_id(
        &self,
        id: ExecutionId,
    ) -> impl Future<Output = Result<Option<ExecutionRecord>, RuleHubError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_rule(
        &self,
        rule_id: RuleId,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = Result<Vec<ExecutionRecord>, RuleHubError>> + Send {
        (**self).find_by_rule(rule_id, limit, offset)
    }
}

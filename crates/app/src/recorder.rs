//! Execution recorder — persists chain outcomes and serves history.
//!
//! The recorder owns the tail end of the pipeline: it stores the
//! terminal status with its per-action results, bumps the rule's
//! execution counter (atomically, in storage), and announces the
//! finished execution on the event bus.

use tracing::warn;

use rulehub_domain::error::{NotFoundError, RuleHubError};
use rulehub_domain::event::Event;
use rulehub_domain::execution::{ActionResult, ExecutionRecord, outcome_of};
use rulehub_domain::id::{ExecutionId, RuleId, TenantId};

use crate::ports::{EventPublisher, ExecutionRepository, RuleRepository};

/// Event type announced on the bus when a chain reaches a terminal
/// status. Engine-internal events never match tenant rules because
/// rules are validated against business event types at authoring time.
pub const EXECUTION_FINISHED: &str = "automation.execution_finished";

/// Persists execution outcomes and answers history queries.
#[derive(Clone)]
pub struct ExecutionRecorder<E, R, P> {
    executions: E,
    rules: R,
    publisher: P,
}

impl<E, R, P> ExecutionRecorder<E, R, P>
where
    E: ExecutionRepository,
    R: RuleRepository,
    P: EventPublisher,
{
    pub fn new(executions: E, rules: R, publisher: P) -> Self {
        Self {
            executions,
            rules,
            publisher,
        }
    }

    /// Store the terminal outcome computed from `results`, bump the
    /// rule's execution counter, and announce the finished execution.
    ///
    /// The bus announcement is fire-and-forget: a publish failure is
    /// logged but does not fail the recording.
    ///
    /// # Errors
    ///
    /// Returns a storage error when persisting the outcome or bumping
    /// the counter fails.
    #[tracing::instrument(skip(self, results), fields(execution_id = %execution_id, rule_id = %rule_id))]
    pub async fn record_outcome(
        &self,
        execution_id: ExecutionId,
        rule_id: RuleId,
        tenant_id: Option<TenantId>,
        results: Vec<ActionResult>,
    ) -> Result<ExecutionRecord, RuleHubError> {
        let status = outcome_of(&results);
        let record = self
            .executions
            .complete(execution_id, status, results, rulehub_domain::time::now())
            .await?;
        self.rules.increment_execution_count(rule_id).await?;

        let announcement = Event::new(
            EXECUTION_FINISHED,
            tenant_id,
            serde_json::json!({
                "execution_id": record.id,
                "rule_id": rule_id,
                "status": record.status,
            }),
        );
        if let Err(error) = self.publisher.publish(announcement).await {
            warn!(%error, "failed to announce finished execution");
        }

        Ok(record)
    }

    /// Look up a single execution record.
    ///
    /// # Errors
    ///
    /// Returns [`RuleHubError::NotFound`] when no record with `id`
    /// exists, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_execution(&self, id: ExecutionId) -> Result<ExecutionRecord, RuleHubError> {
        self.executions.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Execution",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Page through a rule's execution history, newest-first. The rule
    /// must exist; its history may legitimately be empty.
    ///
    /// # Errors
    ///
    /// Returns [`RuleHubError::NotFound`] when the rule does not exist,
    /// or a storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn history(
        &self,
        rule_id: RuleId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ExecutionRecord>, RuleHubError> {
        if self.rules.get_by_id(rule_id).await?.is_none() {
            return Err(NotFoundError {
                entity: "Rule",
                id: rule_id.to_string(),
            }
            .into());
        }
        self.executions.find_by_rule(rule_id, limit, offset).await
    }
}

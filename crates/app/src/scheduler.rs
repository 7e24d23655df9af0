//! Execution scheduler — runs one rule's action chain.
//!
//! Actions run strictly in order. Each action first observes its own
//! delay, then is attempted through its registered handler; transient
//! failures of retryable action types are retried with exponential
//! backoff. A failed action is recorded and the chain moves on to the
//! next one.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use rulehub_domain::execution::ActionResult;
use rulehub_domain::rule::{Action, AutomationRule};

use crate::config::EngineConfig;
use crate::handlers::{ActionContext, HandlerRegistry};
use crate::ports::ActionError;

/// Runs action chains against the handler registry with the configured
/// retry policy.
pub struct ExecutionScheduler {
    registry: Arc<HandlerRegistry>,
    config: EngineConfig,
}

impl ExecutionScheduler {
    pub fn new(registry: Arc<HandlerRegistry>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Execute every action of the rule in order and return one result
    /// per action. Never fails as a whole: action failures (including
    /// an unregistered action type) become `Failure` results.
    #[tracing::instrument(skip_all, fields(rule_id = %rule.id, rule_name = %rule.name))]
    pub async fn run_chain(&self, rule: &AutomationRule, ctx: &ActionContext) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(rule.actions.len());
        for action in &rule.actions {
            results.push(self.run_action(action, ctx).await);
        }
        results
    }

    async fn run_action(&self, action: &Action, ctx: &ActionContext) -> ActionResult {
        let action_type = action.kind.type_name();

        if action.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(action.delay_ms)).await;
        }

        let Some(handler) = self.registry.resolve(action_type) else {
            warn!(action_type, "no handler registered for action type");
            return ActionResult::failure(
                action_type,
                format!("no handler registered for {action_type}"),
            );
        };

        let max_attempts = if action.kind.is_retryable() {
            self.config.max_retries.max(1)
        } else {
            1
        };

        let mut attempt = 1;
        loop {
            match handler.execute(&action.kind, ctx).await {
                Ok(_) => return ActionResult::success(action_type),
                Err(error) if error.is_transient() && attempt < max_attempts => {
                    let backoff = self.config.backoff_base_ms << (attempt - 1);
                    debug!(action_type, attempt, backoff_ms = backoff, %error, "retrying action");
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                Err(error) => {
                    warn!(action_type, attempt, %error, "action failed");
                    return ActionResult::failure(action_type, error.to_string());
                }
            }
        }
    }
}

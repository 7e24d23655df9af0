//! Event dispatcher — matches incoming events against stored rules.
//!
//! For each event the dispatcher loads the active rules bound to the
//! event's type and tenant (priority order), evaluates their conditions
//! against the payload, records a `PENDING` execution per match (the
//! `(event_id, rule_id)` dedup key makes redelivery harmless), and
//! spawns the action chains. Chains run concurrently up to the
//! configured limit; dispatch itself never waits for a chain.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use rulehub_domain::error::{RuleHubError, ValidationError};
use rulehub_domain::event::Event;
use rulehub_domain::execution::ExecutionRecord;
use rulehub_domain::id::ExecutionId;
use rulehub_domain::rule::evaluate_all;

use crate::handlers::ActionContext;
use crate::recorder::ExecutionRecorder;
use crate::scheduler::ExecutionScheduler;
use crate::ports::{EventPublisher, ExecutionRepository, RuleRepository};

/// Matches events to rules and schedules their action chains.
pub struct EventDispatcher<R, E, P> {
    rules: R,
    executions: E,
    recorder: ExecutionRecorder<E, R, P>,
    scheduler: Arc<ExecutionScheduler>,
    chain_slots: Arc<Semaphore>,
}

impl<R, E, P> EventDispatcher<R, E, P>
where
    R: RuleRepository + Clone + Send + Sync + 'static,
    E: ExecutionRepository + Clone + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    pub fn new(
        rules: R,
        executions: E,
        recorder: ExecutionRecorder<E, R, P>,
        scheduler: Arc<ExecutionScheduler>,
        max_concurrent_chains: usize,
    ) -> Self {
        Self {
            rules,
            executions,
            recorder,
            scheduler,
            chain_slots: Arc::new(Semaphore::new(max_concurrent_chains)),
        }
    }

    /// Process one event: find matching rules, record their executions,
    /// and spawn the action chains. Returns the ids of the executions
    /// scheduled for this event, in dispatch (priority) order.
    ///
    /// A rule whose conditions cannot be evaluated against this payload
    /// is skipped and logged; it does not abort dispatch of the
    /// remaining rules.
    ///
    /// # Errors
    ///
    /// Returns [`RuleHubError::Validation`] when the event carries an
    /// empty event type, or a storage error from the repositories.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id, event_type = %event.event_type))]
    pub async fn dispatch(&self, event: Event) -> Result<Vec<ExecutionId>, RuleHubError> {
        if event.event_type.is_empty() {
            return Err(ValidationError::EmptyEventType.into());
        }

        let rules = self
            .rules
            .get_active_for_event(&event.event_type, event.tenant_id)
            .await?;

        let mut scheduled = Vec::new();
        for rule in rules {
            match evaluate_all(&rule.trigger.conditions, &event.payload) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(error) => {
                    warn!(rule_id = %rule.id, %error, "skipping rule with unevaluable condition");
                    continue;
                }
            }

            // Stamped here, sequentially, so started_at reflects
            // dispatch order even though chains run concurrently.
            let record = ExecutionRecord::pending(rule.id, event.id);
            let execution_id = record.id;
            if !self.executions.insert_pending(record).await? {
                debug!(rule_id = %rule.id, "duplicate delivery, execution already recorded");
                continue;
            }
            scheduled.push(execution_id);

            let ctx = ActionContext {
                rule_id: rule.id,
                tenant_id: event.tenant_id,
                payload: event.payload.clone(),
            };
            let executions = self.executions.clone();
            let recorder = self.recorder.clone();
            let scheduler = Arc::clone(&self.scheduler);
            let slots = Arc::clone(&self.chain_slots);
            tokio::spawn(async move {
                let Ok(_permit) = slots.acquire().await else {
                    return;
                };
                if let Err(error) = executions.mark_running(execution_id).await {
                    warn!(%execution_id, %error, "failed to mark execution running");
                    return;
                }
                let results = scheduler.run_chain(&rule, &ctx).await;
                if let Err(error) = recorder
                    .record_outcome(execution_id, rule.id, ctx.tenant_id, results)
                    .await
                {
                    warn!(%execution_id, %error, "failed to record execution outcome");
                }
            });
        }

        Ok(scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;
    use std::time::Duration;

    use rulehub_domain::execution::{ActionStatus, ExecutionStatus};
    use rulehub_domain::id::TenantId;
    use rulehub_domain::rule::{
        Action, ActionKind, AutomationRule, Condition, NotificationType, Operator, Trigger,
    };

    use crate::config::EngineConfig;
    use crate::handlers::{ActionHandler, HandlerRegistry};
    use crate::ports::ActionError;
    use crate::testing::{InMemoryExecutionRepo, InMemoryRuleRepo, SpyPublisher};

    struct RecordingHandler {
        seen: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl ActionHandler for RecordingHandler {
        async fn execute(
            &self,
            action: &ActionKind,
            _ctx: &ActionContext,
        ) -> Result<Option<Value>, ActionError> {
            self.seen.lock().unwrap().push(action.type_name().to_string());
            if self.fail {
                Err(ActionError::Permanent("boom".to_string()))
            } else {
                Ok(None)
            }
        }
    }

    struct Harness {
        dispatcher:
            EventDispatcher<Arc<InMemoryRuleRepo>, Arc<InMemoryExecutionRepo>, Arc<SpyPublisher>>,
        rules: Arc<InMemoryRuleRepo>,
        executions: Arc<InMemoryExecutionRepo>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    fn harness_with(failing_types: &[&str]) -> Harness {
        let rules = Arc::new(InMemoryRuleRepo::default());
        let executions = Arc::new(InMemoryExecutionRepo::default());
        let publisher = Arc::new(SpyPublisher::default());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut registry = HandlerRegistry::new();
        for action_type in [
            "SEND_NOTIFICATION",
            "SEND_EMAIL",
            "UPDATE_STATUS",
            "CREATE_TASK",
            "TRIGGER_WEBHOOK",
        ] {
            registry.register(
                action_type,
                Box::new(RecordingHandler {
                    seen: Arc::clone(&seen),
                    fail: failing_types.contains(&action_type),
                }),
            );
        }

        let scheduler = Arc::new(ExecutionScheduler::new(
            Arc::new(registry),
            EngineConfig::default(),
        ));
        let recorder = ExecutionRecorder::new(
            Arc::clone(&executions),
            Arc::clone(&rules),
            Arc::clone(&publisher),
        );
        let dispatcher = EventDispatcher::new(
            Arc::clone(&rules),
            Arc::clone(&executions),
            recorder,
            scheduler,
            EngineConfig::default().max_queue_depth,
        );
        Harness {
            dispatcher,
            rules,
            executions,
            seen,
        }
    }

    fn harness() -> Harness {
        harness_with(&[])
    }

    fn notify_action() -> Action {
        Action::immediate(ActionKind::SendNotification {
            title: "New order".to_string(),
            message: "Order {{orderId}} placed".to_string(),
            notification_type: NotificationType::Info,
        })
    }

    fn rule_for(event_type: &str) -> AutomationRule {
        AutomationRule::builder()
            .name(format!("Rule for {event_type}"))
            .trigger(Trigger::on(event_type))
            .action(notify_action())
            .build()
            .unwrap()
    }

    async fn wait_terminal(executions: &InMemoryExecutionRepo, id: ExecutionId) -> ExecutionRecord {
        for _ in 0..200 {
            if let Some(record) = executions.get_by_id(id).await.unwrap()
                && record.status.is_terminal()
            {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("execution {id} did not reach a terminal status");
    }

    #[tokio::test]
    async fn should_schedule_execution_when_event_type_matches() {
        let h = harness();
        h.rules.seed(rule_for("ORDER_PLACED")).await;

        let event = Event::new("ORDER_PLACED", None, serde_json::json!({"orderId": "X123"}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();

        assert_eq!(scheduled.len(), 1);
        let record = wait_terminal(&h.executions, scheduled[0]).await;
        assert_eq!(record.status, ExecutionStatus::Success);
        assert_eq!(h.seen.lock().unwrap().as_slice(), ["SEND_NOTIFICATION"]);
    }

    #[tokio::test]
    async fn should_not_schedule_when_event_type_differs() {
        let h = harness();
        h.rules.seed(rule_for("ORDER_PLACED")).await;

        let event = Event::new("USER_SIGNED_UP", None, serde_json::json!({}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();
        assert!(scheduled.is_empty());
    }

    #[tokio::test]
    async fn should_reject_event_with_empty_type() {
        let h = harness();
        let event = Event::new("", None, serde_json::json!({}));
        let result = h.dispatcher.dispatch(event).await;
        assert!(matches!(result, Err(RuleHubError::Validation(_))));
    }

    #[tokio::test]
    async fn should_fire_rule_with_empty_conditions() {
        let h = harness();
        h.rules.seed(rule_for("ORDER_PLACED")).await;

        let event = Event::new("ORDER_PLACED", None, serde_json::json!({}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();
        assert_eq!(scheduled.len(), 1);
    }

    #[tokio::test]
    async fn should_skip_rule_whose_conditions_do_not_match() {
        let h = harness();
        let mut rule = rule_for("ORDER_PLACED");
        rule.trigger = Trigger::on("ORDER_PLACED").when(Condition {
            field: "total".to_string(),
            operator: Operator::GreaterThan,
            value: serde_json::json!(100),
        });
        h.rules.seed(rule).await;

        let event = Event::new("ORDER_PLACED", None, serde_json::json!({"total": 50}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();
        assert!(scheduled.is_empty());
    }

    #[tokio::test]
    async fn should_skip_rule_with_malformed_condition_but_dispatch_others() {
        let h = harness();
        let mut broken = rule_for("ORDER_PLACED");
        broken.priority = 1;
        // `in` needs an array value; a scalar makes it unevaluable.
        broken.trigger = Trigger::on("ORDER_PLACED").when(Condition {
            field: "status".to_string(),
            operator: Operator::In,
            value: serde_json::json!("paid"),
        });
        h.rules.seed(broken).await;
        let mut ok = rule_for("ORDER_PLACED");
        ok.priority = 2;
        let ok = h.rules.seed(ok).await;

        let event = Event::new("ORDER_PLACED", None, serde_json::json!({"status": "paid"}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();

        assert_eq!(scheduled.len(), 1);
        let record = wait_terminal(&h.executions, scheduled[0]).await;
        assert_eq!(record.rule_id, ok.id);
    }

    #[tokio::test]
    async fn should_skip_inactive_rules() {
        let h = harness();
        let mut rule = rule_for("ORDER_PLACED");
        rule.is_active = false;
        h.rules.seed(rule).await;

        let event = Event::new("ORDER_PLACED", None, serde_json::json!({}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();
        assert!(scheduled.is_empty());
    }

    #[tokio::test]
    async fn should_record_executions_in_priority_order() {
        let h = harness();
        let mut low = rule_for("ORDER_PLACED");
        low.priority = 10;
        let low = h.rules.seed(low).await;
        let mut high = rule_for("ORDER_PLACED");
        high.priority = 1;
        let high = h.rules.seed(high).await;

        let event = Event::new("ORDER_PLACED", None, serde_json::json!({}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();
        assert_eq!(scheduled.len(), 2);

        let first = wait_terminal(&h.executions, scheduled[0]).await;
        let second = wait_terminal(&h.executions, scheduled[1]).await;
        assert_eq!(first.rule_id, high.id);
        assert_eq!(second.rule_id, low.id);
        assert!(first.started_at <= second.started_at);
    }

    #[tokio::test]
    async fn should_not_schedule_twice_for_redelivered_event() {
        let h = harness();
        h.rules.seed(rule_for("ORDER_PLACED")).await;

        let event = Event::new("ORDER_PLACED", None, serde_json::json!({}));
        let first = h.dispatcher.dispatch(event.clone()).await.unwrap();
        let second = h.dispatcher.dispatch(event).await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        wait_terminal(&h.executions, first[0]).await;
        assert_eq!(h.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_apply_global_and_own_tenant_rules_only() {
        let h = harness();
        let tenant = TenantId::new();
        let other = TenantId::new();

        let global = h.rules.seed(rule_for("ORDER_PLACED")).await;
        let mut own = rule_for("ORDER_PLACED");
        own.scope = rulehub_domain::rule::RuleScope::Tenant { tenant_id: tenant };
        let own = h.rules.seed(own).await;
        let mut foreign = rule_for("ORDER_PLACED");
        foreign.scope = rulehub_domain::rule::RuleScope::Tenant { tenant_id: other };
        h.rules.seed(foreign).await;

        let event = Event::new("ORDER_PLACED", Some(tenant), serde_json::json!({}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();
        assert_eq!(scheduled.len(), 2);

        let mut rule_ids: Vec<_> = Vec::new();
        for id in scheduled {
            rule_ids.push(wait_terminal(&h.executions, id).await.rule_id);
        }
        assert!(rule_ids.contains(&global.id));
        assert!(rule_ids.contains(&own.id));
    }

    #[tokio::test]
    async fn should_record_partial_failure_with_result_per_action() {
        let h = harness_with(&["TRIGGER_WEBHOOK"]);
        let mut rule = rule_for("ORDER_PLACED");
        rule.actions.push(Action::immediate(ActionKind::TriggerWebhook {
            url: "https://hooks.example.com".to_string(),
        }));
        rule.actions.push(Action::immediate(ActionKind::CreateTask {
            title: "Follow up".to_string(),
            assignee: "support".to_string(),
        }));
        h.rules.seed(rule).await;

        let event = Event::new("ORDER_PLACED", None, serde_json::json!({}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();
        let record = wait_terminal(&h.executions, scheduled[0]).await;

        assert_eq!(record.status, ExecutionStatus::PartialFailure);
        assert_eq!(record.action_results.len(), 3);
        assert_eq!(record.action_results[0].status, ActionStatus::Success);
        assert_eq!(record.action_results[1].status, ActionStatus::Failure);
        assert_eq!(record.action_results[2].status, ActionStatus::Success);
    }

    #[tokio::test]
    async fn should_bump_execution_count_after_chain_completes() {
        let h = harness();
        let rule = h.rules.seed(rule_for("ORDER_PLACED")).await;

        let event = Event::new("ORDER_PLACED", None, serde_json::json!({}));
        let scheduled = h.dispatcher.dispatch(event).await.unwrap();
        wait_terminal(&h.executions, scheduled[0]).await;

        let stored = h.rules.get_by_id(rule.id).await.unwrap().unwrap();
        assert_eq!(stored.execution_count, 1);
    }
}

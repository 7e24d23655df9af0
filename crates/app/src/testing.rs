//! In-memory port implementations shared by the unit tests.

use std::collections::HashMap;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;

use rulehub_domain::error::{NotFoundError, RuleHubError};
use rulehub_domain::event::Event;
use rulehub_domain::execution::{ActionResult, ExecutionRecord, ExecutionStatus};
use rulehub_domain::id::{EventId, ExecutionId, RuleId, TenantId};
use rulehub_domain::rule::AutomationRule;
use rulehub_domain::time::Timestamp;

use crate::ports::{EventPublisher, ExecutionRepository, RuleRepository};

#[derive(Default)]
pub(crate) struct InMemoryRuleRepo {
    store: Mutex<HashMap<RuleId, AutomationRule>>,
}

impl InMemoryRuleRepo {
    /// Insert a rule directly, bypassing the service layer.
    pub(crate) async fn seed(&self, rule: AutomationRule) -> AutomationRule {
        self.create(rule).await.unwrap()
    }
}

impl RuleRepository for InMemoryRuleRepo {
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RuleHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        store.insert(rule.id, rule.clone());
        async { Ok(rule) }
    }

    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, RuleHubError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<AutomationRule>, RuleHubError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<AutomationRule> = store.values().cloned().collect();
        async { Ok(result) }
    }

    fn get_active_for_event(
        &self,
        event_type: &str,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, RuleHubError>> + Send {
        let store = self.store.lock().unwrap();
        let mut result: Vec<AutomationRule> = store
            .values()
            .filter(|r| {
                r.is_active
                    && r.trigger.event_type == event_type
                    && r.scope.applies_to(tenant_id)
            })
            .cloned()
            .collect();
        result.sort_by_key(AutomationRule::dispatch_key);
        async { Ok(result) }
    }

    fn update(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RuleHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        store.insert(rule.id, rule.clone());
        async { Ok(rule) }
    }

    fn delete(&self, id: RuleId) -> impl Future<Output = Result<(), RuleHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        store.remove(&id);
        async { Ok(()) }
    }

    fn increment_execution_count(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<(), RuleHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = match store.get_mut(&id) {
            Some(rule) => {
                rule.execution_count += 1;
                rule.updated_at = rulehub_domain::time::now();
                Ok(())
            }
            None => Err(NotFoundError {
                entity: "Rule",
                id: id.to_string(),
            }
            .into()),
        };
        async { result }
    }
}

#[derive(Default)]
pub(crate) struct InMemoryExecutionRepo {
    store: Mutex<HashMap<ExecutionId, ExecutionRecord>>,
    dedup: Mutex<HashSet<(EventId, RuleId)>>,
}

impl ExecutionRepository for InMemoryExecutionRepo {
    fn insert_pending(
        &self,
        record: ExecutionRecord,
    ) -> impl Future<Output = Result<bool, RuleHubError>> + Send {
        let inserted = self
            .dedup
            .lock()
            .unwrap()
            .insert((record.event_id, record.rule_id));
        if inserted {
            self.store.lock().unwrap().insert(record.id, record);
        }
        async move { Ok(inserted) }
    }

    fn mark_running(
        &self,
        id: ExecutionId,
    ) -> impl Future<Output = Result<(), RuleHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = match store.get_mut(&id) {
            Some(record) => {
                record.status = ExecutionStatus::Running;
                Ok(())
            }
            None => Err(NotFoundError {
                entity: "Execution",
                id: id.to_string(),
            }
            .into()),
        };
        async { result }
    }

    fn complete(
        &self,
        id: ExecutionId,
        status: ExecutionStatus,
        results: Vec<ActionResult>,
        finished_at: Timestamp,
    ) -> impl Future<Output = Result<ExecutionRecord, RuleHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = match store.get_mut(&id) {
            Some(record) => {
                record.status = status;
                record.action_results = results;
                record.finished_at = Some(finished_at);
                Ok(record.clone())
            }
            None => Err(NotFoundError {
                entity: "Execution",
                id: id.to_string(),
            }
            .into()),
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: ExecutionId,
    ) -> impl Future<Output = Result<Option<ExecutionRecord>, RuleHubError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_rule(
        &self,
        rule_id: RuleId,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = Result<Vec<ExecutionRecord>, RuleHubError>> + Send {
        let store = self.store.lock().unwrap();
        let mut all: Vec<ExecutionRecord> = store
            .values()
            .filter(|r| r.rule_id == rule_id)
            .cloned()
            .collect();
        all.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        let result: Vec<ExecutionRecord> = all.into_iter().skip(offset).take(limit).collect();
        async { Ok(result) }
    }
}

#[derive(Default)]
pub(crate) struct SpyPublisher {
    pub(crate) events: Mutex<Vec<Event>>,
}

impl EventPublisher for SpyPublisher {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), RuleHubError>> + Send {
        self.events.lock().unwrap().push(event);
        async { Ok(()) }
    }
}

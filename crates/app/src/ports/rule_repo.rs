//! Rule repository port — persistence for automation rules.

use std::future::Future;
use std::sync::Arc;

use rulehub_domain::error::RuleHubError;
use rulehub_domain::id::{RuleId, TenantId};
use rulehub_domain::rule::AutomationRule;

/// Repository for persisting and querying [`AutomationRule`]s.
pub trait RuleRepository {
    /// Create a new rule in storage.
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RuleHubError>> + Send;

    /// Get a rule by its unique identifier.
    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, RuleHubError>> + Send;

    /// Get all rules.
    fn get_all(&self) -> impl Future<Output = Result<Vec<AutomationRule>, RuleHubError>> + Send;

    /// Get the active rules that apply to an event of the given type and
    /// tenant (global rules plus the tenant's own), sorted ascending by
    /// priority with ties broken by rule id.
    fn get_active_for_event(
        &self,
        event_type: &str,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, RuleHubError>> + Send;

    /// Update an existing rule.
    fn update(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RuleHubError>> + Send;

    /// Delete a rule by its unique identifier. Idempotent: deleting an
    /// absent rule is not an error.
    fn delete(&self, id: RuleId) -> impl Future<Output = Result<(), RuleHubError>> + Send;

    /// Atomically increment the rule's execution counter and bump its
    /// `updated_at`. Implementations must use a storage-level atomic
    /// increment, never a read-modify-write in application code.
    fn increment_execution_count(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<(), RuleHubError>> + Send;
}

impl<T: RuleRepository + Send + Sync> RuleRepository for Arc<T> {
    fn create(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RuleHubError>> + Send {
        (**self).create(rule)
    }

    fn get_by_id(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<Option<AutomationRule>, RuleHubError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<AutomationRule>, RuleHubError>> + Send {
        (**self).get_all()
    }

    fn get_active_for_event(
        &self,
        event_type: &str,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = Result<Vec<AutomationRule>, RuleHubError>> + Send {
        (**self).get_active_for_event(event_type, tenant_id)
    }

    fn update(
        &self,
        rule: AutomationRule,
    ) -> impl Future<Output = Result<AutomationRule, RuleHubError>> + Send {
        (**self).update(rule)
    }

    fn delete(&self, id: RuleId) -> impl Future<Output = Result<(), RuleHubError>> + Send {
        (**self).delete(id)
    }

    fn increment_execution_count(
        &self,
        id: RuleId,
    ) -> impl Future<Output = Result<(), RuleHubError>> + Send {
        (**self).increment_execution_count(id)
    }
}

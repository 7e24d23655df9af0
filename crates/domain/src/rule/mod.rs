//! Automation rule — trigger → condition → action chain.
//!
//! A rule binds a business event type to an ordered chain of actions,
//! scoped either to a single tenant or to the whole platform. Rules are
//! authored externally; the engine only reads immutable snapshots of
//! them, and the execution counter is bumped through the recorder.

mod action;
mod condition;
mod trigger;

pub use action::{Action, ActionKind, NotificationType};
pub use condition::{Condition, Operator, evaluate_all};
pub use trigger::Trigger;

use serde::{Deserialize, Serialize};

use crate::error::{RuleHubError, ValidationError};
use crate::id::{RuleId, TenantId};
use crate::time::Timestamp;

/// Visibility of a rule: bound to one tenant or platform-wide.
///
/// Global rules are tenant-agnostic templates; their conditions must not
/// assume tenant-specific payload fields exist (missing fields simply
/// evaluate to no-match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleScope {
    Global,
    Tenant { tenant_id: TenantId },
}

impl RuleScope {
    /// Build a scope from its wire parts, enforcing scope/tenant
    /// consistency. A tenant id passed alongside `GLOBAL` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownScope`] for an unrecognised
    /// scope name and [`ValidationError::MissingTenantId`] when scope is
    /// `TENANT` without a tenant id.
    pub fn from_parts(
        scope: &str,
        tenant_id: Option<TenantId>,
    ) -> Result<Self, ValidationError> {
        match scope {
            "GLOBAL" => Ok(Self::Global),
            "TENANT" => tenant_id
                .map(|tenant_id| Self::Tenant { tenant_id })
                .ok_or(ValidationError::MissingTenantId),
            other => Err(ValidationError::UnknownScope(other.to_string())),
        }
    }

    /// Whether a rule with this scope applies to an event from the given
    /// tenant (`None` for platform-level events).
    #[must_use]
    pub fn applies_to(self, tenant_id: Option<TenantId>) -> bool {
        match self {
            Self::Global => true,
            Self::Tenant { tenant_id: own } => tenant_id == Some(own),
        }
    }

    /// The tenant this rule belongs to, if tenant-scoped.
    #[must_use]
    pub fn tenant_id(self) -> Option<TenantId> {
        match self {
            Self::Global => None,
            Self::Tenant { tenant_id } => Some(tenant_id),
        }
    }
}

/// A stored configuration binding an event trigger to an action chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: RuleId,
    pub name: String,
    /// Display metadata, not interpreted by the engine.
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub scope: RuleScope,
    pub trigger: Trigger,
    /// Executed strictly in order; failures are isolated per action.
    pub actions: Vec<Action>,
    /// Lower value = evaluated and executed earlier among matches.
    /// Ties are broken by `id` for determinism.
    #[serde(default)]
    pub priority: i32,
    pub is_active: bool,
    /// Monotonically increasing; mutated only by the execution recorder.
    #[serde(default)]
    pub execution_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RuleHubError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - `trigger.event_type` is empty ([`ValidationError::EmptyEventType`])
    /// - the rule is active with no actions ([`ValidationError::NoActions`])
    pub fn validate(&self) -> Result<(), RuleHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.trigger.event_type.is_empty() {
            return Err(ValidationError::EmptyEventType.into());
        }
        if self.is_active && self.actions.is_empty() {
            return Err(ValidationError::NoActions.into());
        }
        Ok(())
    }

    /// Sort key for dispatch ordering: ascending priority, then rule id.
    #[must_use]
    pub fn dispatch_key(&self) -> (i32, RuleId) {
        (self.priority, self.id)
    }
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<RuleId>,
    name: Option<String>,
    description: Option<String>,
    scope: Option<RuleScope>,
    trigger: Option<Trigger>,
    actions: Vec<Action>,
    priority: Option<i32>,
    is_active: Option<bool>,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: RuleScope) -> Self {
        self.scope = Some(scope);
        self
    }

    #[must_use]
    pub fn tenant(mut self, tenant_id: TenantId) -> Self {
        self.scope = Some(RuleScope::Tenant { tenant_id });
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// # Errors
    ///
    /// Returns [`RuleHubError::Validation`] if required fields are
    /// missing or invariants fail.
    pub fn build(self) -> Result<AutomationRule, RuleHubError> {
        let now = crate::time::now();
        let rule = AutomationRule {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            scope: self.scope.unwrap_or(RuleScope::Global),
            trigger: self.trigger.unwrap_or_else(|| Trigger::on("")),
            actions: self.actions,
            priority: self.priority.unwrap_or(0),
            is_active: self.is_active.unwrap_or(true),
            execution_count: 0,
            created_at: now,
            updated_at: now,
        };
        rule.validate()?;
        Ok(rule)
    }
}

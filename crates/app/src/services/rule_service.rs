//! Rule service — use-cases for managing automation rules.

use rulehub_domain::error::{NotFoundError, RuleHubError};
use rulehub_domain::id::RuleId;
use rulehub_domain::rule::AutomationRule;

use crate::ports::RuleRepository;

/// Application service for rule CRUD operations.
pub struct RuleService<R> {
    repo: R,
}

impl<R: RuleRepository> RuleService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new rule after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RuleHubError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, rule), fields(rule_name = %rule.name))]
    pub async fn create_rule(&self, rule: AutomationRule) -> Result<AutomationRule, RuleHubError> {
        rule.validate()?;
        self.repo.create(rule).await
    }

    /// Look up a rule by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`RuleHubError::NotFound`] when no rule with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_rule(&self, id: RuleId) -> Result<AutomationRule, RuleHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Rule",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all rules.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_rules(&self) -> Result<Vec<AutomationRule>, RuleHubError> {
        self.repo.get_all().await
    }

    /// Update an existing rule's configuration.
    ///
    /// The execution counter and creation timestamp are owned by the
    /// engine, so they are carried over from the stored rule rather
    /// than taken from the caller.
    ///
    /// # Errors
    ///
    /// Returns [`RuleHubError::NotFound`] when the rule does not exist,
    /// [`RuleHubError::Validation`] if invariants fail, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, rule), fields(rule_id = %rule.id))]
    pub async fn update_rule(&self, mut rule: AutomationRule) -> Result<AutomationRule, RuleHubError> {
        let existing = self.get_rule(rule.id).await?;
        rule.execution_count = existing.execution_count;
        rule.created_at = existing.created_at;
        rule.updated_at = rulehub_domain::time::now();
        rule.validate()?;
        self.repo.update(rule).await
    }

    /// Delete a rule by id. Idempotent: deleting an absent rule succeeds.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_rule(&self, id: RuleId) -> Result<(), RuleHubError> {
        self.repo.delete(id).await
    }
}

//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`RuleHubError`] via `#[from]`. Adapters wrap their infrastructure
//! errors (sqlx, HTTP, …) into the opaque `Storage` variant.

/// Top-level error for the rulehub engine.
#[derive(Debug, thiserror::Error)]
pub enum RuleHubError {
    /// A rule definition violated a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced aggregate does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A rule's conditions could not be evaluated against an event.
    #[error("condition evaluation error")]
    Evaluation(#[from] EvaluationError),

    /// An infrastructure failure in a storage adapter.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Violations of rule invariants, surfaced synchronously to the
/// authoring caller and never retried.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The rule name is empty.
    #[error("rule name must not be empty")]
    EmptyName,

    /// The trigger event type is empty.
    #[error("trigger event type must not be empty")]
    EmptyEventType,

    /// An active rule has no actions.
    #[error("an active rule must have at least one action")]
    NoActions,

    /// A tenant-scoped rule is missing its tenant id.
    #[error("scope TENANT requires a tenant id")]
    MissingTenantId,

    /// The scope value is not one of `TENANT` / `GLOBAL`.
    #[error("unknown scope {0:?}")]
    UnknownScope(String),

    /// An action declares a negative or otherwise unusable delay.
    #[error("action delay is out of range")]
    InvalidDelay,
}

/// A lookup referenced an absent aggregate.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Aggregate kind, e.g. `"AutomationRule"`.
    pub entity: &'static str,
    /// Stringified identifier.
    pub id: String,
}

/// A condition is malformed and cannot be evaluated.
///
/// These are authoring mistakes that only become visible at dispatch
/// time; the affected rule is skipped and logged, siblings still run.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    /// The `in` operator requires an array comparison value.
    #[error("operator `in` requires an array value for field {field:?}")]
    ExpectedArray { field: String },

    /// `greaterThan` / `lessThan` require a numeric comparison value.
    #[error("ordering operator requires a numeric value for field {field:?}")]
    ExpectedNumber { field: String },

    /// The `exists` operator requires a boolean comparison value.
    #[error("operator `exists` requires a boolean value for field {field:?}")]
    ExpectedBool { field: String },
}

//! Action — one step in a matched rule's execution chain.
//!
//! Action configs are modelled as an internally-tagged union so each
//! action type carries its own strongly-typed fields instead of an open
//! key/value bag. String fields may embed `{{fieldPath}}` placeholders
//! interpolated from the event payload at execution time.

use serde::{Deserialize, Serialize};

/// Severity of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

/// Typed configuration for each built-in action type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Deliver an in-app notification.
    SendNotification {
        title: String,
        message: String,
        notification_type: NotificationType,
    },
    /// Render a template and hand it to the mail transport.
    SendEmail { subject: String, template: String },
    /// Apply a status transition to a named external entity type.
    UpdateStatus { entity: String, status: String },
    /// Create a work item for a role or queue.
    CreateTask { title: String, assignee: String },
    /// Issue an outbound HTTP call with the event context as JSON body.
    TriggerWebhook { url: String },
}

impl ActionKind {
    /// The wire name of this action type, as used by the handler registry.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SendNotification { .. } => "SEND_NOTIFICATION",
            Self::SendEmail { .. } => "SEND_EMAIL",
            Self::UpdateStatus { .. } => "UPDATE_STATUS",
            Self::CreateTask { .. } => "CREATE_TASK",
            Self::TriggerWebhook { .. } => "TRIGGER_WEBHOOK",
        }
    }

    /// Whether transient failures of this action type may be retried.
    ///
    /// Email and webhook delivery are safe to retry; notifications,
    /// status transitions and task creation must not be duplicated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SendEmail { .. } | Self::TriggerWebhook { .. })
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One chain step: an action plus the delay observed before running it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(flatten)]
    pub kind: ActionKind,
    /// Milliseconds to wait before executing this action; not cumulative
    /// with other actions' delays beyond their own.
    #[serde(default)]
    pub delay_ms: u64,
}

impl Action {
    /// An action with no delay.
    #[must_use]
    pub fn immediate(kind: ActionKind) -> Self {
        Self { kind, delay_ms: 0 }
    }

    /// An action delayed by `delay_ms` milliseconds.
    #[must_use]
    pub fn delayed(kind: ActionKind, delay_ms: u64) -> Self {
        Self { kind, delay_ms }
    }
}

//! Collaborator ports — the external systems behind built-in actions.
//!
//! The engine never talks to notification centres, mail servers, order
//! services, task boards, or remote HTTP endpoints directly; each
//! built-in action handler calls one of these traits, and adapters (or
//! test doubles) supply the implementation.

use std::future::Future;
use std::sync::Arc;

use rulehub_domain::id::TenantId;
use rulehub_domain::rule::NotificationType;

/// Failure of a collaborator call, classified for retry policy.
///
/// `Transient` covers timeouts, connection refusals, and 5xx-style
/// upstream failures that may succeed on a later attempt; everything
/// else is `Permanent` and is never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    Transient(String),
    #[error("{0}")]
    Permanent(String),
}

impl ActionError {
    /// Whether a retry may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// An in-app notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
}

/// A rendered email ready for the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

/// A work item for a role or queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub title: String,
    pub assignee: String,
}

/// Delivers in-app notifications.
pub trait NotificationSink {
    fn deliver(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;
}

/// Hands rendered emails to the outbound mail system.
pub trait MailTransport {
    fn send(&self, message: EmailMessage) -> impl Future<Output = Result<(), ActionError>> + Send;
}

/// Applies status transitions to named external entity types
/// (order, customer, …) owned by other services.
pub trait StatusChanger {
    fn apply(
        &self,
        entity: &str,
        status: &str,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;
}

/// Creates work items in the platform's task system.
pub trait TaskQueue {
    fn create(&self, task: TaskItem) -> impl Future<Output = Result<(), ActionError>> + Send;
}

/// Issues outbound HTTP calls for webhook actions.
///
/// Returns the HTTP status code on a completed exchange; transport
/// failures (timeout, connection refused) are reported as errors.
pub trait WebhookClient {
    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<u16, ActionError>> + Send;
}

impl<T: NotificationSink + Send + Sync> NotificationSink for Arc<T> {
    fn deliver(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).deliver(notification)
    }
}

impl<T: MailTransport + Send + Sync> MailTransport for Arc<T> {
    fn send(&self, message: EmailMessage) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).send(message)
    }
}

impl<T: StatusChanger + Send + Sync> StatusChanger for Arc<T> {
    fn apply(
        &self,
        entity: &str,
        status: &str,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).apply(entity, status, tenant_id)
    }
}

impl<T: TaskQueue + Send + Sync> TaskQueue for Arc<T> {
    fn create(&self, task: TaskItem) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).create(task)
    }
}

impl<T: WebhookClient + Send + Sync> WebhookClient for Arc<T> {
    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<u16, ActionError>> + Send {
        (**self).post_json(url, body)
    }
}

//! # rulehub-adapter-virtual
//!
//! Virtual/demo collaborator adapter for local runs and demonstrations.
//! Every collaborator call is logged via `tracing` and appended to an
//! in-memory journal instead of reaching a real external system.
//!
//! ## Provided collaborators
//!
//! | Collaborator | Port | Behaviour |
//! |--------------|------|-----------|
//! | [`VirtualNotificationSink`] | `NotificationSink` | Logs and journals notifications |
//! | [`VirtualMailTransport`] | `MailTransport` | Logs and journals outbound emails |
//! | [`VirtualStatusChanger`] | `StatusChanger` | Logs and journals status transitions |
//! | [`VirtualTaskQueue`] | `TaskQueue` | Logs and journals created tasks |
//!
//! ## Dependency rule
//!
//! Depends on `rulehub-app` (port traits) and `rulehub-domain` only.

use std::sync::Mutex;

use rulehub_app::ports::{
    ActionError, EmailMessage, MailTransport, Notification, NotificationSink, StatusChanger,
    TaskItem, TaskQueue,
};
use rulehub_domain::id::TenantId;

/// A journalled status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub entity: String,
    pub status: String,
    pub tenant_id: Option<TenantId>,
}

/// Notification sink that logs deliveries.
#[derive(Debug, Default)]
pub struct VirtualNotificationSink {
    delivered: Mutex<Vec<Notification>>,
}

impl VirtualNotificationSink {
    /// Snapshot of everything delivered so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        lock(&self.delivered).clone()
    }
}

impl NotificationSink for VirtualNotificationSink {
    async fn deliver(&self, notification: Notification) -> Result<(), ActionError> {
        tracing::info!(
            title = %notification.title,
            kind = ?notification.kind,
            "virtual notification delivered"
        );
        lock(&self.delivered).push(notification);
        Ok(())
    }
}

/// Mail transport that logs outbound messages.
#[derive(Debug, Default)]
pub struct VirtualMailTransport {
    sent: Mutex<Vec<EmailMessage>>,
}

impl VirtualMailTransport {
    /// Snapshot of every message handed to the transport.
    #[must_use]
    pub fn sent(&self) -> Vec<EmailMessage> {
        lock(&self.sent).clone()
    }
}

impl MailTransport for VirtualMailTransport {
    async fn send(&self, message: EmailMessage) -> Result<(), ActionError> {
        tracing::info!(subject = %message.subject, "virtual email sent");
        lock(&self.sent).push(message);
        Ok(())
    }
}

/// Status changer that logs transitions.
#[derive(Debug, Default)]
pub struct VirtualStatusChanger {
    applied: Mutex<Vec<StatusChange>>,
}

impl VirtualStatusChanger {
    /// Snapshot of every transition applied so far.
    #[must_use]
    pub fn applied(&self) -> Vec<StatusChange> {
        lock(&self.applied).clone()
    }
}

impl StatusChanger for VirtualStatusChanger {
    async fn apply(
        &self,
        entity: &str,
        status: &str,
        tenant_id: Option<TenantId>,
    ) -> Result<(), ActionError> {
        tracing::info!(entity, status, ?tenant_id, "virtual status change applied");
        lock(&self.applied).push(StatusChange {
            entity: entity.to_string(),
            status: status.to_string(),
            tenant_id,
        });
        Ok(())
    }
}

/// Task queue that logs created work items.
#[derive(Debug, Default)]
pub struct VirtualTaskQueue {
    created: Mutex<Vec<TaskItem>>,
}

impl VirtualTaskQueue {
    /// Snapshot of every task created so far.
    #[must_use]
    pub fn created(&self) -> Vec<TaskItem> {
        lock(&self.created).clone()
    }
}

impl TaskQueue for VirtualTaskQueue {
    async fn create(&self, task: TaskItem) -> Result<(), ActionError> {
        tracing::info!(title = %task.title, assignee = %task.assignee, "virtual task created");
        lock(&self.created).push(task);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

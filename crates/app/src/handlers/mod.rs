//! Action handlers — pluggable executors for each action type.
//!
//! The registry maps an action type name to an [`ActionHandler`]. The
//! scheduler resolves handlers by the action's wire name; an action
//! whose type has no registered handler is recorded as a failure for
//! that action only, without halting the chain.

mod email;
mod notify;
mod status;
mod task;
mod webhook;

pub use email::EmailHandler;
pub use notify::NotifyHandler;
pub use status::UpdateStatusHandler;
pub use task::CreateTaskHandler;
pub use webhook::WebhookHandler;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use rulehub_domain::id::{RuleId, TenantId};
use rulehub_domain::rule::ActionKind;

use crate::ports::collaborators::{
    ActionError, MailTransport, NotificationSink, StatusChanger, TaskQueue, WebhookClient,
};

/// Execution context passed to every handler: the triggering event's
/// payload (for template interpolation) and rule metadata.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub rule_id: RuleId,
    pub tenant_id: Option<TenantId>,
    pub payload: Value,
}

/// Executes one action kind against its collaborator.
///
/// Object-safe so heterogeneous handlers can live in one registry;
/// hence `async_trait` rather than the RPITIT style used by the ports.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Run the action. `Ok` may carry a JSON output for logging;
    /// failures are classified transient/permanent for the retry policy.
    async fn execute(
        &self,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<Option<Value>, ActionError>;
}

/// Maps action type names to their handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn ActionHandler>>,
}

impl HandlerRegistry {
    /// An empty registry. Mostly useful in tests; production code wires
    /// the built-ins via [`HandlerRegistry::with_builtins`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for an action type name.
    pub fn register(&mut self, action_type: impl Into<String>, handler: Box<dyn ActionHandler>) {
        self.handlers.insert(action_type.into(), handler);
    }

    /// Resolve the handler for an action type name.
    #[must_use]
    pub fn resolve(&self, action_type: &str) -> Option<&dyn ActionHandler> {
        self.handlers.get(action_type).map(Box::as_ref)
    }

    /// A registry with all five built-in handlers wired to the given
    /// collaborators.
    #[must_use]
    pub fn with_builtins<N, M, S, T, W>(
        notifications: N,
        mail: M,
        statuses: S,
        tasks: T,
        webhooks: W,
    ) -> Self
    where
        N: NotificationSink + Send + Sync + 'static,
        M: MailTransport + Send + Sync + 'static,
        S: StatusChanger + Send + Sync + 'static,
        T: TaskQueue + Send + Sync + 'static,
        W: WebhookClient + Send + Sync + 'static,
    {
        let mut registry = Self::default();
        registry.register(
            "SEND_NOTIFICATION",
            Box::new(NotifyHandler::new(notifications)),
        );
        registry.register("SEND_EMAIL", Box::new(EmailHandler::new(mail)));
        registry.register("UPDATE_STATUS", Box::new(UpdateStatusHandler::new(statuses)));
        registry.register("CREATE_TASK", Box::new(CreateTaskHandler::new(tasks)));
        registry.register("TRIGGER_WEBHOOK", Box::new(WebhookHandler::new(webhooks)));
        registry
    }
}

/// Rejection for a handler invoked with a mismatched action variant.
/// Cannot happen through the registry (dispatch is by type name) but
/// keeps hand-wired registries honest.
pub(crate) fn mismatched(action: &ActionKind) -> ActionError {
    ActionError::Permanent(format!("handler received unexpected action {action}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysOk;

    #[async_trait]
    impl ActionHandler for AlwaysOk {
        async fn execute(
            &self,
            _action: &ActionKind,
            _ctx: &ActionContext,
        ) -> Result<Option<Value>, ActionError> {
            Ok(None)
        }
    }

    #[test]
    fn should_resolve_registered_handler() {
        let mut registry = HandlerRegistry::new();
        registry.register("SEND_NOTIFICATION", Box::new(AlwaysOk));
        assert!(registry.resolve("SEND_NOTIFICATION").is_some());
    }

    #[test]
    fn should_return_none_for_unregistered_type() {
        let registry = HandlerRegistry::new();
        assert!(registry.resolve("TRIGGER_WEBHOOK").is_none());
    }

    #[test]
    fn should_replace_handler_when_registered_twice() {
        let mut registry = HandlerRegistry::new();
        registry.register("CREATE_TASK", Box::new(AlwaysOk));
        registry.register("CREATE_TASK", Box::new(AlwaysOk));
        assert!(registry.resolve("CREATE_TASK").is_some());
    }
}

//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod collaborators;
pub mod event_bus;
pub mod execution_repo;
pub mod rule_repo;

pub use collaborators::{
    ActionError, EmailMessage, MailTransport, Notification, NotificationSink, StatusChanger,
    TaskItem, TaskQueue, WebhookClient,
};
pub use event_bus::EventPublisher;
pub use execution_repo::ExecutionRepository;
pub use rule_repo::RuleRepository;

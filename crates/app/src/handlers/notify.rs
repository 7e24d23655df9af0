//! Built-in handler for `SEND_NOTIFICATION`.

use async_trait::async_trait;
use serde_json::Value;

use rulehub_domain::rule::ActionKind;
use rulehub_domain::template::render;

use crate::ports::collaborators::{ActionError, Notification, NotificationSink};

use super::{ActionContext, ActionHandler, mismatched};

/// Interpolates title/message from the event payload and hands the
/// notification to the sink. Not retried: a duplicate notification is
/// worse than a missing one.
pub struct NotifyHandler<N> {
    sink: N,
}

impl<N> NotifyHandler<N> {
    pub fn new(sink: N) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl<N: NotificationSink + Send + Sync> ActionHandler for NotifyHandler<N> {
    async fn execute(
        &self,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<Option<Value>, ActionError> {
        let ActionKind::SendNotification {
            title,
            message,
            notification_type,
        } = action
        else {
            return Err(mismatched(action));
        };

        let notification = Notification {
            title: render(title, &ctx.payload),
            message: render(message, &ctx.payload),
            kind: *notification_type,
        };
        self.sink.deliver(notification).await?;
        Ok(None)
    }
}

//! Built-in handler for `SEND_EMAIL`.

use async_trait::async_trait;
use serde_json::Value;

use rulehub_domain::rule::ActionKind;
use rulehub_domain::template::render;

use crate::ports::collaborators::{ActionError, EmailMessage, MailTransport};

use super::{ActionContext, ActionHandler, mismatched};

/// Renders subject and body templates with the event context and hands
/// the message to the mail transport. Transient transport failures are
/// retried by the scheduler.
pub struct EmailHandler<M> {
    transport: M,
}

impl<M> EmailHandler<M> {
    pub fn new(transport: M) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<M: MailTransport + Send + Sync> ActionHandler for EmailHandler<M> {
    async fn execute(
        &self,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<Option<Value>, ActionError> {
        let ActionKind::SendEmail { subject, template } = action else {
            return Err(mismatched(action));
        };

        let message = EmailMessage {
            subject: render(subject, &ctx.payload),
            body: render(template, &ctx.payload),
        };
        self.transport.send(message).await?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulehub_domain::id::RuleId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct SpyTransport {
        sent: Mutex<Vec<EmailMessage>>,
    }

    impl MailTransport for &SpyTransport {
        async fn send(&self, message: EmailMessage) -> Result<(), ActionError> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_render_subject_and_body_before_sending() {
        let transport = SpyTransport::default();
        let handler = EmailHandler::new(&transport);

        let action = ActionKind::SendEmail {
            subject: "Payment {{status}}".to_string(),
            template: "Amount due: {{amount}}".to_string(),
        };
        let ctx = ActionContext {
            rule_id: RuleId::new(),
            tenant_id: None,
            payload: serde_json::json!({"status": "failed", "amount": 99}),
        };
        handler.execute(&action, &ctx).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Payment failed");
        assert_eq!(sent[0].body, "Amount due: 99");
    }
}

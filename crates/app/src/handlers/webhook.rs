//! Built-in handler for `TRIGGER_WEBHOOK`.

use async_trait::async_trait;
use serde_json::{Value, json};

use rulehub_domain::rule::ActionKind;
use rulehub_domain::template::render;

use crate::ports::collaborators::{ActionError, WebhookClient};

use super::{ActionContext, ActionHandler, mismatched};

/// Posts the event payload to the configured URL. Any 2xx counts as
/// success; 5xx, 408 and 429 are transient and retried; everything else
/// is permanent.
pub struct WebhookHandler<W> {
    client: W,
}

impl<W> WebhookHandler<W> {
    pub fn new(client: W) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<W: WebhookClient + Send + Sync> ActionHandler for WebhookHandler<W> {
    async fn execute(
        &self,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<Option<Value>, ActionError> {
        let ActionKind::TriggerWebhook { url } = action else {
            return Err(mismatched(action));
        };

        let url = render(url, &ctx.payload);
        let body = json!({
            "rule_id": ctx.rule_id,
            "tenant_id": ctx.tenant_id,
            "payload": ctx.payload,
        });
        let status = self.client.post_json(&url, &body).await?;
        match status {
            200..=299 => Ok(Some(json!({ "status": status }))),
            408 | 429 | 500..=599 => Err(ActionError::Transient(format!(
                "webhook {url} answered {status}"
            ))),
            other => Err(ActionError::Permanent(format!(
                "webhook {url} answered {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulehub_domain::id::RuleId;
    use std::sync::Mutex;

    struct FixedStatus {
        status: u16,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl FixedStatus {
        fn new(status: u16) -> Self {
            Self {
                status,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl WebhookClient for &FixedStatus {
        async fn post_json(&self, url: &str, body: &Value) -> Result<u16, ActionError> {
            self.calls.lock().unwrap().push((url.to_string(), body.clone()));
            Ok(self.status)
        }
    }

    fn ctx() -> ActionContext {
        ActionContext {
            rule_id: RuleId::new(),
            tenant_id: None,
            payload: serde_json::json!({"orderId": "X123"}),
        }
    }

    fn action() -> ActionKind {
        ActionKind::TriggerWebhook {
            url: "https://hooks.example.com/orders".to_string(),
        }
    }

    #[tokio::test]
    async fn should_report_success_for_2xx() {
        let client = FixedStatus::new(204);
        let handler = WebhookHandler::new(&client);

        let out = handler.execute(&action(), &ctx()).await.unwrap();
        assert_eq!(out, Some(serde_json::json!({"status": 204})));

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1["payload"]["orderId"], "X123");
    }

    #[tokio::test]
    async fn should_classify_5xx_as_transient() {
        let client = FixedStatus::new(503);
        let handler = WebhookHandler::new(&client);

        let err = handler.execute(&action(), &ctx()).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn should_classify_4xx_as_permanent() {
        let client = FixedStatus::new(404);
        let handler = WebhookHandler::new(&client);

        let err = handler.execute(&action(), &ctx()).await.unwrap_err();
        assert!(!err.is_transient());
    }
}

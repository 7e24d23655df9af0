//! Built-in handler for `UPDATE_STATUS`.

use async_trait::async_trait;
use serde_json::Value;

use rulehub_domain::rule::ActionKind;
use rulehub_domain::template::render;

use crate::ports::collaborators::{ActionError, StatusChanger};

use super::{ActionContext, ActionHandler, mismatched};

/// Applies a status transition to a named external entity type through
/// the collaborator interface. Not retried: a transition must not be
/// applied twice.
pub struct UpdateStatusHandler<S> {
    statuses: S,
}

impl<S> UpdateStatusHandler<S> {
    pub fn new(statuses: S) -> Self {
        Self { statuses }
    }
}

#[async_trait]
impl<S: StatusChanger + Send + Sync> ActionHandler for UpdateStatusHandler<S> {
    async fn execute(
        &self,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<Option<Value>, ActionError> {
        let ActionKind::UpdateStatus { entity, status } = action else {
            return Err(mismatched(action));
        };

        let entity = render(entity, &ctx.payload);
        let status = render(status, &ctx.payload);
        self.statuses.apply(&entity, &status, ctx.tenant_id).await?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulehub_domain::id::{RuleId, TenantId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct SpyChanger {
        applied: Mutex<Vec<(String, String, Option<TenantId>)>>,
    }

    impl StatusChanger for &SpyChanger {
        async fn apply(
            &self,
            entity: &str,
            status: &str,
            tenant_id: Option<TenantId>,
        ) -> Result<(), ActionError> {
            self.applied
                .lock()
                .unwrap()
                .push((entity.to_string(), status.to_string(), tenant_id));
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_apply_interpolated_transition_with_tenant() {
        let changer = SpyChanger::default();
        let handler = UpdateStatusHandler::new(&changer);
        let tenant = TenantId::new();

        let action = ActionKind::UpdateStatus {
            entity: "order".to_string(),
            status: "{{nextStatus}}".to_string(),
        };
        let ctx = ActionContext {
            rule_id: RuleId::new(),
            tenant_id: Some(tenant),
            payload: serde_json::json!({"nextStatus": "shipped"}),
        };
        handler.execute(&action, &ctx).await.unwrap();

        let applied = changer.applied.lock().unwrap();
        assert_eq!(
            applied[0],
            ("order".to_string(), "shipped".to_string(), Some(tenant))
        );
    }
}

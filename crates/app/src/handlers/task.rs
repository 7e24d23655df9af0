//! Built-in handler for `CREATE_TASK`.

use async_trait::async_trait;
use serde_json::Value;

use rulehub_domain::rule::ActionKind;
use rulehub_domain::template::render;

use crate::ports::collaborators::{ActionError, TaskItem, TaskQueue};

use super::{ActionContext, ActionHandler, mismatched};

/// Creates a work item for a named role or queue. Not retried: a
/// duplicated task would land on somebody's board.
pub struct CreateTaskHandler<T> {
    tasks: T,
}

impl<T> CreateTaskHandler<T> {
    pub fn new(tasks: T) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl<T: TaskQueue + Send + Sync> ActionHandler for CreateTaskHandler<T> {
    async fn execute(
        &self,
        action: &ActionKind,
        ctx: &ActionContext,
    ) -> Result<Option<Value>, ActionError> {
        let ActionKind::CreateTask { title, assignee } = action else {
            return Err(mismatched(action));
        };

        let task = TaskItem {
            title: render(title, &ctx.payload),
            assignee: render(assignee, &ctx.payload),
        };
        self.tasks.create(task).await?;
        Ok(None)
    }
}

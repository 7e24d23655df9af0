//! Shared application state for axum handlers.

use std::sync::Arc;

use rulehub_app::ports::{EventPublisher, ExecutionRepository, RuleRepository};
use rulehub_app::recorder::ExecutionRecorder;
use rulehub_app::services::RuleService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository and publisher types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone` — only the `Arc` wrappers are
/// cloned.
pub struct AppState<R, E, P> {
    /// Rule authoring CRUD service.
    pub rule_service: Arc<RuleService<R>>,
    /// Execution history queries.
    pub recorder: Arc<ExecutionRecorder<E, R, P>>,
    /// Event intake: incoming events are published to the bus and
    /// dispatched asynchronously.
    pub publisher: Arc<P>,
}

impl<R, E, P> Clone for AppState<R, E, P> {
    fn clone(&self) -> Self {
        Self {
            rule_service: Arc::clone(&self.rule_service),
            recorder: Arc::clone(&self.recorder),
            publisher: Arc::clone(&self.publisher),
        }
    }
}

impl<R, E, P> AppState<R, E, P>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    /// Create a new application state from pre-wrapped `Arc` components.
    ///
    /// The recorder and publisher are shared with the background
    /// dispatch loop, so they arrive already wrapped.
    pub fn from_arcs(
        rule_service: Arc<RuleService<R>>,
        recorder: Arc<ExecutionRecorder<E, R, P>>,
        publisher: Arc<P>,
    ) -> Self {
        Self {
            rule_service,
            recorder,
            publisher,
        }
    }
}

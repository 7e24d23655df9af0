//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod executions;
#[allow(clippy::missing_errors_doc)]
pub mod rules;

use axum::Router;
use axum::routing::{get, post};

use rulehub_app::ports::{EventPublisher, ExecutionRepository, RuleRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, E, P>() -> Router<AppState<R, E, P>>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        // Rules
        .route(
            "/rules",
            get(rules::list::<R, E, P>).post(rules::create::<R, E, P>),
        )
        .route(
            "/rules/{id}",
            get(rules::get::<R, E, P>)
                .put(rules::update::<R, E, P>)
                .delete(rules::delete::<R, E, P>),
        )
        .route(
            "/rules/{id}/executions",
            get(executions::list_for_rule::<R, E, P>),
        )
        // Executions
        .route("/executions/{id}", get(executions::get::<R, E, P>))
        // Event intake
        .route("/events", post(events::publish::<R, E, P>))
}

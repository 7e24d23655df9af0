//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use rulehub_app::ports::{EventPublisher, ExecutionRepository, RuleRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the JSON API under `/api` plus a `/health` probe. Includes a
/// [`TraceLayer`] that logs each HTTP request/response at the `DEBUG`
/// level using the `tracing` ecosystem.
pub fn build<R, E, P>(state: AppState<R, E, P>) -> Router
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

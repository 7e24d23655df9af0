//! JSON REST handler for event intake.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use rulehub_app::ports::{EventPublisher, ExecutionRepository, RuleRepository};
use rulehub_domain::error::{RuleHubError, ValidationError};
use rulehub_domain::event::Event;
use rulehub_domain::id::{EventId, TenantId};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for publishing a business event.
#[derive(Deserialize)]
pub struct PublishEventRequest {
    /// Producer-assigned id used for dedup; generated when absent.
    #[serde(default)]
    pub id: Option<EventId>,
    pub event_type: String,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Acknowledgement body for accepted events.
#[derive(Serialize)]
pub struct EventAccepted {
    pub event_id: EventId,
}

/// Possible responses from the publish endpoint.
pub enum PublishResponse {
    /// The event was accepted for asynchronous dispatch.
    Accepted(Json<EventAccepted>),
}

impl IntoResponse for PublishResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
        }
    }
}

/// `POST /api/events` — accept a business event for dispatch.
///
/// The event is validated, published to the in-process bus and
/// acknowledged with `202 Accepted`; matching and chain execution
/// happen asynchronously in the dispatch loop.
pub async fn publish<R, E, P>(
    State(state): State<AppState<R, E, P>>,
    Json(req): Json<PublishEventRequest>,
) -> Result<PublishResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    if req.event_type.is_empty() {
        return Err(RuleHubError::from(ValidationError::EmptyEventType).into());
    }

    let mut event = Event::new(req.event_type, req.tenant_id, req.payload);
    if let Some(id) = req.id {
        event.id = id;
    }
    let event_id = event.id;

    state.publisher.publish(event).await?;
    Ok(PublishResponse::Accepted(Json(EventAccepted { event_id })))
}

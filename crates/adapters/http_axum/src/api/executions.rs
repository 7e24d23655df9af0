//! JSON REST handlers for execution history.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use rulehub_app::ports::{EventPublisher, ExecutionRepository, RuleRepository};
use rulehub_domain::execution::ExecutionRecord;
use rulehub_domain::id::{ExecutionId, RuleId};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 50;

/// Pagination query parameters for history listings.
#[derive(Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Possible responses from the history endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ExecutionRecord>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<ExecutionRecord>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/rules/{id}/executions` — page through a rule's execution
/// history, newest-first.
pub async fn list_for_rule<R, E, P>(
    State(state): State<AppState<R, E, P>>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<ListResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let rule_id = RuleId::from_str(&id).map_err(|_| ApiError::InvalidId(id))?;
    let records = state
        .recorder
        .history(
            rule_id,
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            query.offset.unwrap_or(0),
        )
        .await?;
    Ok(ListResponse::Ok(Json(records)))
}

/// `GET /api/executions/{id}` — get one execution record.
pub async fn get<R, E, P>(
    State(state): State<AppState<R, E, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let execution_id = ExecutionId::from_str(&id).map_err(|_| ApiError::InvalidId(id))?;
    let record = state.recorder.get_execution(execution_id).await?;
    Ok(GetResponse::Ok(Json(record)))
}

//! JSON REST handlers for automation rules.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use rulehub_app::ports::{EventPublisher, ExecutionRepository, RuleRepository};
use rulehub_domain::id::{RuleId, TenantId};
use rulehub_domain::rule::{Action, AutomationRule, Condition, RuleScope, Trigger};

use crate::error::ApiError;
use crate::state::AppState;

fn default_scope() -> String {
    "GLOBAL".to_string()
}

/// Request body for creating a rule.
#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    pub event_type: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Request body for updating a rule.
#[derive(Deserialize)]
pub struct UpdateRuleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    pub event_type: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
    pub priority: i32,
    pub is_active: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AutomationRule>>),
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
    Ok(Json<AutomationRule>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<AutomationRule>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_rule_id(id: &str) -> Result<RuleId, ApiError> {
    RuleId::from_str(id).map_err(|_| ApiError::InvalidId(id.to_string()))
}

fn build_trigger(event_type: String, conditions: Vec<Condition>) -> Trigger {
    let mut trigger = Trigger::on(event_type);
    for condition in conditions {
        trigger = trigger.when(condition);
    }
    trigger
}

/// `GET /api/rules` — list all rules.
pub async fn list<R, E, P>(
    State(state): State<AppState<R, E, P>>,
) -> Result<ListResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let rules = state.rule_service.list_rules().await?;
    Ok(ListResponse::Ok(Json(rules)))
}

/// `GET /api/rules/{id}` — get rule by ID.
pub async fn get<R, E, P>(
    State(state): State<AppState<R, E, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let rule_id = parse_rule_id(&id)?;
    let rule = state.rule_service.get_rule(rule_id).await?;
    Ok(GetResponse::Ok(Json(rule)))
}

/// `POST /api/rules` — create a new rule.
pub async fn create<R, E, P>(
    State(state): State<AppState<R, E, P>>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<CreateResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let scope = RuleScope::from_parts(&req.scope, req.tenant_id)
        .map_err(rulehub_domain::error::RuleHubError::from)?;

    let mut builder = AutomationRule::builder()
        .name(req.name)
        .scope(scope)
        .trigger(build_trigger(req.event_type, req.conditions));

    if let Some(description) = req.description {
        builder = builder.description(description);
    }
    if let Some(priority) = req.priority {
        builder = builder.priority(priority);
    }
    if let Some(is_active) = req.is_active {
        builder = builder.is_active(is_active);
    }
    for action in req.actions {
        builder = builder.action(action);
    }

    let rule = builder.build()?;
    let created = state.rule_service.create_rule(rule).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/rules/{id}` — update an existing rule.
pub async fn update<R, E, P>(
    State(state): State<AppState<R, E, P>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRuleRequest>,
) -> Result<GetResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let rule_id = parse_rule_id(&id)?;
    let scope = RuleScope::from_parts(&req.scope, req.tenant_id)
        .map_err(rulehub_domain::error::RuleHubError::from)?;

    let mut builder = AutomationRule::builder()
        .id(rule_id)
        .name(req.name)
        .scope(scope)
        .trigger(build_trigger(req.event_type, req.conditions))
        .priority(req.priority)
        .is_active(req.is_active);

    if let Some(description) = req.description {
        builder = builder.description(description);
    }
    for action in req.actions {
        builder = builder.action(action);
    }

    let rule = builder.build()?;
    // The service carries over the stored execution counter and
    // creation timestamp.
    let updated = state.rule_service.update_rule(rule).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/rules/{id}` — delete a rule.
pub async fn delete<R, E, P>(
    State(state): State<AppState<R, E, P>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    E: ExecutionRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    let rule_id = parse_rule_id(&id)?;
    state.rule_service.delete_rule(rule_id).await?;
    Ok(DeleteResponse::NoContent)
}

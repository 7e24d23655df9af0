//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use rulehub_domain::error::RuleHubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps errors to an HTTP response with an appropriate status code.
pub enum ApiError {
    /// A domain error raised by a service.
    Domain(RuleHubError),
    /// A path parameter that is not a valid id.
    InvalidId(String),
}

impl From<RuleHubError> for ApiError {
    fn from(err: RuleHubError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Domain(RuleHubError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(RuleHubError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(RuleHubError::Evaluation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(RuleHubError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::InvalidId(id) => (StatusCode::BAD_REQUEST, format!("invalid id {id:?}")),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

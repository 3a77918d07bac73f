use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_model::ModelError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP callers.
///
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed caller input.
    #[error("{0}")]
    InvalidRequest(String),

    /// Nothing stored under the requested key.
    #[error("{0}")]
    NotFound(String),

    /// Backend failure not attributable to the caller.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Not-found error for a job id, in the caller-facing wording.
    pub fn job_not_found(id: &str) -> Self {
        ApiError::NotFound(format!("job '{id}' not found"))
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

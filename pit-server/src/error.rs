//! Errors surfaced at the HTTP boundary.

use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pit_agent::AgentError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Every failure a route can report. Rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not JSON or lacks a required key.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    /// The agent call panicked or was cancelled.
    #[error("agent call aborted: {0}")]
    Aborted(String),

    #[error("Not found")]
    NotFound,
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MalformedRequest(_) | ApiError::Agent(_) | ApiError::Aborted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let error = self.to_string();
        if status.is_server_error() {
            warn!(%error, "request failed");
        }
        (status, Json(ErrorBody { error })).into_response()
    }
}

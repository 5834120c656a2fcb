use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use error_stack::Report;
use mood_tracker_core::ports::application_service::ApplicationServiceError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0}")]
    Validation(String),

    #[error("Mood storage is temporarily unavailable, try again shortly")]
    Unavailable,

    #[error("{0}")]
    Internal(String),
}

impl From<Report<ApplicationServiceError>> for WebError {
    fn from(report: Report<ApplicationServiceError>) -> Self {
        match report.current_context() {
            ApplicationServiceError::InvalidSubmission(e) => WebError::Validation(e.to_string()),
            error @ ApplicationServiceError::InvalidDateRange { .. } => {
                WebError::Validation(error.to_string())
            }
            ApplicationServiceError::Storage(kind) if kind.is_retryable() => {
                tracing::warn!(error = ?report, "Spreadsheet unavailable");
                WebError::Unavailable
            }
            ApplicationServiceError::Storage(kind) => {
                tracing::error!(error = ?report, "Spreadsheet request failed");
                WebError::Internal(kind.to_string())
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "status": "error",
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

/// Reasons the process stops before or while serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to wire the application")]
    Startup,
    #[error("Failed to bind the listener")]
    Bind,
    #[error("Server terminated with an error")]
    Serve,
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;

/// The primary error type for the API service.
///
/// `AlreadyCleared` and `AttemptsExhausted` are not faults: they are the
/// fixed, non-actionable notices shown when a problem is terminal for the
/// session. `Store` is the only retryable variant.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("problem not found: {0}")]
    ProblemNotFound(String),

    #[error("this problem is already cleared")]
    AlreadyCleared,

    #[error("attempt limit reached for this problem")]
    AttemptsExhausted,

    #[error("submission could not be recorded: {0}")]
    Store(#[from] StoreError),

    #[error("an unexpected internal error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::SessionNotFound(_) | ApiError::ProblemNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyCleared | ApiError::AttemptsExhausted => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, ApiError::Store(_))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "retryable": self.retryable(),
        }));

        (status, body).into_response()
    }
}

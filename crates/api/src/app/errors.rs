//! Consistent JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use guarita_core::DomainError;

use crate::audit::ErrorDetail;

/// Build a `{"error": <message>}` response.
///
/// Failure responses also carry the message as an [`ErrorDetail`] extension
/// so the audit stage can record it without touching the body.
pub fn json_message(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    let mut res = (status, Json(json!({ "error": message }))).into_response();

    if status.is_client_error() || status.is_server_error() {
        res.extensions_mut().insert(ErrorDetail(message));
    }

    res
}

/// Route-boundary error taxonomy. Every handler failure maps here; nothing
/// propagates past the route boundary unhandled.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Unanticipated failure, reported as `"<context>: <message>"`.
    #[error("{context}: {message}")]
    Unexpected { context: String, message: String },
}

impl ApiError {
    pub fn unexpected(context: impl Into<String>, err: impl core::fmt::Display) -> Self {
        Self::Unexpected {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::InvalidId(msg) => ApiError::Validation(msg),
            DomainError::NotFound => ApiError::NotFound("não encontrado".to_string()),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        json_message(status, self.to_string())
    }
}

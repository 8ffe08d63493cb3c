//! Mapping of service errors onto HTTP responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{auth::AuthError, conversation::error::ChatError};

/// An error rendered as `{success: false, error: {code, message}}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and machine-readable code.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Creates a `400 validation_error`.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(inner) => Self::bad_request(inner.to_string()),
            ChatError::Authorization { .. } => Self::new(
                StatusCode::FORBIDDEN,
                "forbidden",
                "not authorized to access this user's conversations",
            ),
            ChatError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "not_found", err.to_string()),
            ChatError::Configuration(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                err.to_string(),
            ),
            ChatError::Agent(_) => Self::new(StatusCode::BAD_GATEWAY, "agent_error", err.to_string()),
            ChatError::Store(inner) => {
                error!(error = %inner, "store operation failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthenticated", err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                status = %self.status,
                code = self.code,
                message = %self.message,
                "request failed"
            );
        }

        let body = json!({
            "success": false,
            "error": {
                "code": self.code,
                "message": self.message,
            },
        });
        (self.status, Json(body)).into_response()
    }
}

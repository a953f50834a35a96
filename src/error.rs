// src/error.rs
//! HTTP error envelope: `{ "error", "error_code", "timestamp" }`.
//!
//! Operational errors show their message to the client; internal ones are
//! logged and replaced with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::prediction::ValidationError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub error_code: String,
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    is_operational: bool,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn model_unavailable() -> Self {
        Self::operational(
            StatusCode::SERVICE_UNAVAILABLE,
            "MODEL_UNAVAILABLE",
            "The prediction model is not loaded. Please try again later.",
        )
    }

    /// Inference failure; the cause goes to the log, not to the client.
    pub fn model(cause: &anyhow::Error) -> Self {
        error!(error = %format!("{cause:#}"), "model error");
        Self::operational(
            StatusCode::INTERNAL_SERVER_ERROR,
            "MODEL_ERROR",
            "Unable to process your request. Please try again.",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.into(),
            is_operational: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    fn operational(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            is_operational: true,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.is_operational {
            self.message
        } else {
            error!(error = %self.message, "internal error");
            "An unexpected error occurred. Please try again later.".to_string()
        };

        let body = ErrorBody {
            error: message,
            error_code: self.code.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        let e: ApiError = ValidationError {
            problems: vec!["Missing required field: Age".into()],
        }
        .into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        assert_eq!(e.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn internal_errors_hide_details() {
        let resp = ApiError::internal("db password leaked").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

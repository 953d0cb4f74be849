//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Insufficient daily allowance.
    #[error("insufficient allowance: remaining={remaining}, required={required}")]
    InsufficientAllowance {
        /// Remaining daily allowance.
        remaining: i64,
        /// Required amount.
        required: i64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error.
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::InsufficientAllowance {
                remaining,
                required,
            } => (
                StatusCode::BAD_REQUEST,
                "insufficient_allowance",
                self.to_string(),
                Some(serde_json::json!({
                    "remaining": remaining,
                    "required": required
                })),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            Self::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                msg.clone(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<slash_tip_store::StoreError> for ApiError {
    fn from(err: slash_tip_store::StoreError) -> Self {
        match err {
            slash_tip_store::StoreError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} not found: {id}"))
            }
            slash_tip_store::StoreError::InsufficientAllowance {
                remaining,
                required,
            } => Self::InsufficientAllowance {
                remaining,
                required,
            },
            slash_tip_store::StoreError::Database(msg)
            | slash_tip_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<slash_tip_relay::RelayError> for ApiError {
    fn from(err: slash_tip_relay::RelayError) -> Self {
        Self::ExternalService(err.to_string())
    }
}

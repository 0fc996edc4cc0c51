//! Error types for tomo-as
//!
//! Every failure leaves the server as `{"error": {"code", "message"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tomo_common::flow::{FlowError, Notice};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown session or resource (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Dashboard requested outside the admin dashboard page (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Blocking notice; the flow did not advance (422)
    #[error("{0}")]
    Notice(#[from] Notice),

    /// Persistence or other core failure (500)
    #[error("Common error: {0}")]
    Common(#[from] tomo_common::Error),
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Rejected(notice) => ApiError::Notice(notice),
            FlowError::Persistence(err) => ApiError::Common(err),
        }
    }
}

/// Stable machine-readable code for a notice
pub fn notice_code(notice: &Notice) -> &'static str {
    match notice {
        Notice::MissingIdentity => "MISSING_IDENTITY",
        Notice::IncompleteAnswers { .. } => "INCOMPLETE_ANSWERS",
        Notice::WrongPassword => "WRONG_PASSWORD",
        Notice::UnknownOption { .. } => "UNKNOWN_OPTION",
        Notice::InvalidAnswer { .. } => "INVALID_ANSWER",
        Notice::NotAvailable { .. } => "NOT_AVAILABLE",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::Notice(ref notice) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                notice_code(notice),
                notice.to_string(),
            ),
            ApiError::Common(ref err) => {
                tracing::error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    err.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

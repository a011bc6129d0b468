use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Raised when a metric or visitor category name is not one of the known
/// enumerants. Lets callers tell "bad input" apart from "no data".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("invalid metric: {0:?}")]
    InvalidMetric(String),
    #[error("invalid visitor category: {0:?}")]
    InvalidCategory(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Website name is required")]
    NameTooShort,
    #[error("Please enter a valid URL")]
    InvalidUrl,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),

    #[error(transparent)]
    Validation(#[from] RegistrationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::InvalidSelector(_) => (StatusCode::BAD_REQUEST, "INVALID_SELECTOR"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(error_code = %code, error_message = %self, "API error occurred");
        } else {
            tracing::debug!(error_code = %code, error_message = %self, "Rejected request");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

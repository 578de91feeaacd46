//! Application error taxonomy and its HTTP mapping.
//!
//! Every failure is scoped to a single request. Validation errors are raised
//! before any store access; store failures are classified by the repository
//! layer into [`AppError::AllocationConflict`] or [`AppError::Persistence`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use validator::ValidationErrors;

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The submitted URL is not a structurally valid absolute URL.
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// The short code normalizes to fewer than 3 characters.
    #[error("Invalid short code format")]
    InvalidCodeFormat,

    /// The request body failed field validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Link not found")]
    NotFound,

    /// The insert lost a race on the `short_code` uniqueness constraint.
    #[error("Short code already allocated: {0}")]
    AllocationConflict(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl(reason.into())
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    pub fn persistence(cause: impl Into<String>) -> Self {
        Self::Persistence(cause.into())
    }

    pub fn internal(cause: impl Into<String>) -> Self {
        Self::Internal(cause.into())
    }

    /// Stable machine-readable kind used in error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::InvalidCodeFormat => "invalid_code_format",
            Self::InvalidRequest(_) => "invalid_request",
            Self::NotFound => "not_found",
            Self::AllocationConflict(_) => "allocation_conflict",
            Self::Persistence(_) => "persistence_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl(_) | Self::InvalidCodeFormat | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AllocationConflict(_) => StatusCode::CONFLICT,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to HTTP clients.
    ///
    /// Store and internal causes are logged but never echoed back.
    fn public_message(&self) -> String {
        match self {
            Self::Persistence(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.public_message(),
            code: self.kind(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::InvalidRequest(e.to_string())
    }
}

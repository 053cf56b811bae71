//! Unified error handling with Sentry integration.
//!
//! All route handlers return `Result<T, AppError>`; every response body is
//! JSON: `{"error": <message>}` plus a `details` array for validation
//! failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input validation failed; each detail names one field issue.
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Admin is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (e.g. viewer on a mutating endpoint).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// State conflict (invalid status transition, label already exists).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An upstream API (aggregator, ad catalog) failed.
    #[error("Upstream error: {0}")]
    BadGateway(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Convenience constructor for a single-field validation failure.
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(vec![detail.into()])
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::BadGateway(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let (error, details) = match self {
            Self::Validation(details) => ("Validation failed".to_string(), details),
            Self::Database(RepositoryError::NotFound) => ("Not found".to_string(), Vec::new()),
            Self::Database(RepositoryError::Conflict(msg)) => (msg, Vec::new()),
            Self::Database(_) | Self::Internal(_) => {
                ("Internal server error".to_string(), Vec::new())
            }
            Self::BadGateway(_) => ("Upstream service unavailable".to_string(), Vec::new()),
            other => (other.to_string(), Vec::new()),
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::validation("rate out of range")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Forbidden("viewer role".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Conflict("label already exists".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::BadGateway("parcel creation failed".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_upstream_detail_not_exposed() {
        let response =
            AppError::BadGateway("secret internal detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}

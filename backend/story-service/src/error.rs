/// Error types for story-service
///
/// Every failure a handler can produce is one of these variants, and each maps
/// to its own HTTP status so clients can tell a missing document from an outage.
use crate::store::StoreError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for story-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// No document matches the given identifier combination
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid caller identity on a protected route
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed or incomplete request body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Store failure or any other unexpected condition
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "resource store operation failed");
        // Store details stay in the logs.
        AppError::Internal("resource store unavailable".to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

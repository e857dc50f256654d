//! Error handling module
//!
//! Errors at the dispatcher boundary and their conversion into a failure
//! response envelope. Nothing past this point is allowed to reach the
//! transport as anything other than a well-formed envelope.

use crate::protocol::Response;
use crate::repository::RepositoryError;

/// Dispatcher-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Protocol errors
    #[error("invalid message format")]
    InvalidMessageFormat,

    #[error("unknown action")]
    UnknownAction(String),

    // Validation errors
    #[error("{0}")]
    InvalidRequest(String),

    // Repository errors, surfaced verbatim
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to encode response: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl AppError {
    /// Create a validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Stable machine-readable code, used as a log field
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidMessageFormat => "invalid_message_format",
            AppError::UnknownAction(_) => "unknown_action",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Repository(RepositoryError::NotFound { .. }) => "not_found",
            AppError::Repository(RepositoryError::InsufficientStock { .. }) => "insufficient_stock",
            AppError::Repository(RepositoryError::Database(_)) => "database_error",
            AppError::Encoding(_) => "encoding_error",
        }
    }

    /// Check if the store failed (as opposed to the client sending a bad request)
    pub fn is_server_error(&self) -> bool {
        match self {
            AppError::Repository(e) => !e.is_client_error(),
            AppError::Encoding(_) => true,
            _ => false,
        }
    }

    /// Convert into a failure envelope
    pub fn into_response(self) -> Response {
        Response::failure(self.to_string())
    }
}

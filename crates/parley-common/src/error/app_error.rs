//! Application error types
//!
//! Unified error handling for the entire application.

use parley_core::DomainError;
use serde::Serialize;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authorization errors
    #[error("Not a participant of the target conversation")]
    NotParticipant,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Redis errors
    #[error("Cache error: {0}")]
    Cache(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get a stable error code for client-facing responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if this is an expected client-side error (bad request, not
    /// found, conflict) as opposed to a server failure
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::NotParticipant
            | Self::Validation(_)
            | Self::InvalidInput(_)
            | Self::NotFound(_)
            | Self::Conflict(_) => true,
            Self::Domain(e) => !e.is_store_unavailable() && !matches!(e, DomainError::InternalError(_)),
            _ => false,
        }
    }

    /// Check if this is a server error
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error response structure delivered to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Snowflake;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotParticipant.error_code(), "NOT_PARTICIPANT");
        assert_eq!(AppError::NotFound("user".to_string()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Cache("down".to_string()).error_code(), "CACHE_ERROR");
    }

    #[test]
    fn test_domain_error_code_passthrough() {
        let err = AppError::Domain(DomainError::MessageNotFound(Snowflake::new(1)));
        assert_eq!(err.error_code(), "UNKNOWN_MESSAGE");
    }

    #[test]
    fn test_is_client_error() {
        assert!(AppError::NotParticipant.is_client_error());
        assert!(AppError::NotFound("test".to_string()).is_client_error());
        assert!(!AppError::Database("test".to_string()).is_client_error());
        assert!(!AppError::Domain(DomainError::DatabaseError("down".into())).is_client_error());
        assert!(AppError::Domain(DomainError::MissingContent).is_client_error());
    }

    #[test]
    fn test_error_response() {
        let err = AppError::NotFound("user".to_string());
        let response = ErrorResponse::from(&err);

        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "Resource not found: user");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_helper_methods() {
        let err = AppError::not_found("user 123");
        assert_eq!(err.to_string(), "Resource not found: user 123");

        let err = AppError::validation("content is required");
        assert_eq!(err.to_string(), "Validation error: content is required");
    }
}

//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use parley_common::AppError;
use parley_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (config, infrastructure, etc.)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Validation error
    Validation(String),

    /// Conflict (e.g., duplicate resource)
    Conflict(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the stable error code for wire responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error is safe to attribute to client input
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Domain(e) => !e.is_store_unavailable(),
            Self::App(e) => e.is_client_error(),
            Self::NotFound { .. } | Self::Validation(_) | Self::Conflict(_) => true,
            Self::Internal(_) => false,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => AppError::NotFound(format!("{resource} {id}")),
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Snowflake;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("User", "123");
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.is_client_error());
        assert!(err.to_string().contains("User not found: 123"));
    }

    #[test]
    fn test_domain_error_code_passthrough() {
        let err = ServiceError::from(DomainError::NotParticipant {
            user_id: Snowflake::new(1),
            conversation_id: Snowflake::new(2),
        });
        assert_eq!(err.error_code(), "NOT_PARTICIPANT");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_store_errors_are_not_client_errors() {
        let err = ServiceError::from(DomainError::DatabaseError("down".to_string()));
        assert!(!err.is_client_error());

        let err = ServiceError::internal("boom");
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_convert_to_app_error() {
        let service_err = ServiceError::conflict("duplicate reaction");
        let app_err: AppError = service_err.into();
        assert_eq!(app_err.error_code(), "CONFLICT");
    }
}

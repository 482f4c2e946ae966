//! Handler error types

use parley_core::DomainError;
use parley_service::ServiceError;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Event received before identify bound a user
    #[error("Not identified")]
    NotIdentified,

    /// Identify received on an already-bound connection
    #[error("Already identified")]
    AlreadyIdentified,

    /// Service error
    #[error("{0}")]
    Service(#[from] ServiceError),

    /// Domain error (from repositories)
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Stable code for the wire `error` event
    pub fn code(&self) -> &str {
        match self {
            Self::NotIdentified => "NOT_IDENTIFIED",
            Self::AlreadyIdentified => "ALREADY_IDENTIFIED",
            Self::Service(e) => e.error_code(),
            Self::Domain(e) => e.code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to put on the wire
    ///
    /// Store and internal failures get a generic message; the detail stays
    /// in the logs.
    pub fn client_message(&self) -> String {
        match self {
            Self::Service(e) if !e.is_client_error() => "Internal error".to_string(),
            Self::Domain(e) if e.is_store_unavailable() => "Internal error".to_string(),
            Self::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Snowflake;

    #[test]
    fn test_codes() {
        assert_eq!(HandlerError::NotIdentified.code(), "NOT_IDENTIFIED");
        assert_eq!(HandlerError::AlreadyIdentified.code(), "ALREADY_IDENTIFIED");

        let err = HandlerError::from(DomainError::NotParticipant {
            user_id: Snowflake::new(1),
            conversation_id: Snowflake::new(2),
        });
        assert_eq!(err.code(), "NOT_PARTICIPANT");
    }

    #[test]
    fn test_store_failures_are_masked_on_the_wire() {
        let err = HandlerError::from(DomainError::DatabaseError("password in dsn".to_string()));
        assert_eq!(err.client_message(), "Internal error");

        let err = HandlerError::from(DomainError::MissingContent);
        assert!(err.client_message().contains("content"));
    }
}

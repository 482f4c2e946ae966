//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("User {user_id} is not a participant of conversation {conversation_id}")]
    NotParticipant {
        user_id: Snowflake,
        conversation_id: Snowflake,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message must carry text content or an attachment")]
    MissingContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Reaction already exists")]
    ReactionAlreadyExists,

    #[error("User is already a participant of this conversation")]
    AlreadyParticipant,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for client-facing rejection events
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            Self::NotParticipant { .. } => "NOT_PARTICIPANT",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MissingContent => "MISSING_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            Self::ReactionAlreadyExists => "REACTION_ALREADY_EXISTS",
            Self::AlreadyParticipant => "ALREADY_PARTICIPANT",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::ConversationNotFound(_) | Self::MessageNotFound(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotParticipant { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::MissingContent | Self::ContentTooLong { .. }
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ReactionAlreadyExists | Self::AlreadyParticipant)
    }

    /// Check if this is a store-unavailable error
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::CacheError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::NotParticipant {
            user_id: Snowflake::new(1),
            conversation_id: Snowflake::new(2),
        };
        assert_eq!(err.code(), "NOT_PARTICIPANT");

        let err = DomainError::MissingContent;
        assert_eq!(err.code(), "MISSING_CONTENT");
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::ConversationNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::NotParticipant {
            user_id: Snowflake::new(1),
            conversation_id: Snowflake::new(2),
        }
        .is_authorization());
        assert!(DomainError::MissingContent.is_validation());
        assert!(DomainError::ReactionAlreadyExists.is_conflict());
        assert!(DomainError::DatabaseError("down".into()).is_store_unavailable());
        assert!(!DomainError::MissingContent.is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::MessageNotFound(Snowflake::new(123));
        assert_eq!(err.to_string(), "Message not found: 123");

        let err = DomainError::ContentTooLong { max: 4000 };
        assert_eq!(err.to_string(), "Content too long: max 4000 characters");
    }
}

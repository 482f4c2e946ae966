//! Request DTOs for gateway commands
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

use parley_core::Snowflake;

/// Maximum message text length in characters
pub const MAX_CONTENT_LENGTH: usize = 4000;

/// Send message request
///
/// Either `content` or `attachment_url` must be present; the cross-field
/// invariant is enforced by the messaging service before any store access.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub conversation_id: Snowflake,

    #[validate(length(max = 4000, message = "Message must be at most 4000 characters"))]
    pub content: Option<String>,

    #[validate(url(message = "Invalid attachment URL"))]
    pub attachment_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_request_deserializes_string_ids() {
        let request: SendMessageRequest = serde_json::from_str(
            r#"{"conversation_id": "12345", "content": "hello"}"#,
        )
        .unwrap();

        assert_eq!(request.conversation_id, Snowflake::new(12345));
        assert_eq!(request.content.as_deref(), Some("hello"));
        assert!(request.attachment_url.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_send_message_request_rejects_oversized_content() {
        let request = SendMessageRequest {
            conversation_id: Snowflake::new(1),
            content: Some("x".repeat(MAX_CONTENT_LENGTH + 1)),
            attachment_url: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_send_message_request_rejects_bad_attachment_url() {
        let request = SendMessageRequest {
            conversation_id: Snowflake::new(1),
            content: None,
            attachment_url: Some("not a url".to_string()),
        };

        assert!(request.validate().is_err());
    }
}

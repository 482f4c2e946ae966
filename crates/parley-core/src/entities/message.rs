//! Message entity - a single message inside a conversation

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Message entity
///
/// Immutable once created (no edit/delete). Must carry text content, an
/// attachment reference, or both; `has_body` is the invariant check and
/// callers reject empty messages before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub conversation_id: Snowflake,
    pub sender_id: Snowflake,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new Message
    pub fn new(
        id: Snowflake,
        conversation_id: Snowflake,
        sender_id: Snowflake,
        content: Option<String>,
        attachment_url: Option<String>,
    ) -> Self {
        Self {
            id,
            conversation_id,
            sender_id,
            content,
            attachment_url,
            created_at: Utc::now(),
        }
    }

    /// Check the "text or attachment" invariant
    #[inline]
    pub fn has_body(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.trim().is_empty())
            || self.attachment_url.is_some()
    }

    /// Get a truncated preview of the message text (for notifications)
    pub fn preview(&self, max_len: usize) -> &str {
        let content = self.content.as_deref().unwrap_or("");
        if content.len() <= max_len {
            content
        } else {
            let mut end = max_len;
            while !content.is_char_boundary(end) {
                end -= 1;
            }
            &content[..end]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: Option<&str>, attachment: Option<&str>) -> Message {
        Message::new(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            content.map(String::from),
            attachment.map(String::from),
        )
    }

    #[test]
    fn test_has_body() {
        assert!(message(Some("hi"), None).has_body());
        assert!(message(None, Some("https://cdn/img.png")).has_body());
        assert!(message(Some("hi"), Some("https://cdn/img.png")).has_body());
        assert!(!message(None, None).has_body());
        assert!(!message(Some("   "), None).has_body());
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let msg = message(Some("héllo world"), None);
        // 'é' is two bytes; a cut inside it must back off
        let preview = msg.preview(2);
        assert_eq!(preview, "h");

        assert_eq!(msg.preview(100), "héllo world");
    }
}

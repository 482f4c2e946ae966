//! Message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MessageModel {
    /// Check if message carries an attachment
    #[inline]
    pub fn has_attachment(&self) -> bool {
        self.attachment_url.is_some()
    }
}

/// Row shape for a message JOINed with its sender's profile columns
///
/// Backs the denormalized read used for broadcasts and history, avoiding a
/// second round trip per message for the sender profile.
#[derive(Debug, Clone, FromRow)]
pub struct MessageWithSenderModel {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sender_handle: String,
    pub sender_display_name: String,
    pub sender_avatar: Option<String>,
    pub sender_created_at: DateTime<Utc>,
}

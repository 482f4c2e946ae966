//! Response DTOs crossing the service boundary
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Public user profile response
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub handle: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Message response, joined with the sender's profile
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One participant of a conversation, joined with their profile
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    pub user: UserResponse,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_read_message_id: Option<String>,
}

/// A conversation hydrated for the `ready` payload
#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub participants: Vec<ParticipantView>,
    /// Most recent messages, newest first (bounded window)
    pub recent_messages: Vec<MessageResponse>,
}

/// The resulting read marker after a `mark_read` call
///
/// `message_id` is the marker actually in effect, which may be older than
/// the requested one when the pointer did not move forward.
#[derive(Debug, Clone, Serialize)]
pub struct ReadMarkerResponse {
    pub conversation_id: String,
    pub user_id: String,
    pub message_id: String,
}

/// Reaction response
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub message_id: String,
    pub user_id: String,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

//! Reaction entity - an emoji reaction on a message

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Reaction entity
///
/// The (message_id, user_id, emoji) triple is unique; a duplicate insert is
/// resolved by the store's constraint and translated to a conflict error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(message_id: Snowflake, user_id: Snowflake, emoji: impl Into<String>) -> Self {
        Self {
            message_id,
            user_id,
            emoji: emoji.into(),
            created_at: Utc::now(),
        }
    }
}

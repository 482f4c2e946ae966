//! Conversation entity - a message thread with a fixed set of participants

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Conversation entity
///
/// Owns its participants and messages. Never hard-deleted; `updated_at`
/// moves forward whenever a message is saved, which drives recency ordering
/// of a user's conversation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new Conversation
    pub fn new(id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_timestamps() {
        let conv = Conversation::new(Snowflake::new(1));
        assert_eq!(conv.created_at, conv.updated_at);
    }
}

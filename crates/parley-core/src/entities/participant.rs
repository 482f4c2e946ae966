//! Participant entity - membership of a user in a conversation

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Participant entity
///
/// The (conversation_id, user_id) pair is unique; the database enforces it
/// and duplicate joins surface as a conflict. `last_read_message_id` is a
/// weak reference to a message, used for read receipts only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub conversation_id: Snowflake,
    pub user_id: Snowflake,
    pub joined_at: DateTime<Utc>,
    pub last_read_message_id: Option<Snowflake>,
}

impl Participant {
    /// Create a new Participant with no read marker
    pub fn new(conversation_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            conversation_id,
            user_id,
            joined_at: Utc::now(),
            last_read_message_id: None,
        }
    }

    /// Whether `message_id` would move the read marker forward.
    ///
    /// Snowflakes order by creation time, so "forward" is a plain comparison.
    #[inline]
    pub fn advances_read_marker(&self, message_id: Snowflake) -> bool {
        match self.last_read_message_id {
            Some(current) => message_id > current,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_read_marker() {
        let mut p = Participant::new(Snowflake::new(1), Snowflake::new(2));
        assert!(p.advances_read_marker(Snowflake::new(10)));

        p.last_read_message_id = Some(Snowflake::new(10));
        assert!(!p.advances_read_marker(Snowflake::new(10)));
        assert!(!p.advances_read_marker(Snowflake::new(5)));
        assert!(p.advances_read_marker(Snowflake::new(11)));
    }
}

//! Presence store port
//!
//! Ephemeral state the domain needs from the cache layer: per-user
//! presence records, the global online set, typing indicators, and cached
//! unread counters. Implementations own key layout and TTL enforcement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repositories::RepoResult;
use crate::value_objects::Snowflake;

/// User presence data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceData {
    /// User ID
    pub user_id: Snowflake,
    /// Gateway connection IDs currently open for this user
    pub connection_ids: Vec<String>,
    /// Last activity timestamp (unix seconds)
    pub last_seen: i64,
}

impl PresenceData {
    /// Create presence data with a first connection
    #[must_use]
    pub fn new(user_id: Snowflake, connection_id: String) -> Self {
        Self {
            user_id,
            connection_ids: vec![connection_id],
            last_seen: chrono::Utc::now().timestamp(),
        }
    }

    /// Add a connection
    pub fn add_connection(&mut self, connection_id: String) {
        if !self.connection_ids.contains(&connection_id) {
            self.connection_ids.push(connection_id);
        }
    }

    /// Remove a connection
    pub fn remove_connection(&mut self, connection_id: &str) {
        self.connection_ids.retain(|c| c != connection_id);
    }

    /// Check if the user has any open connections
    #[must_use]
    pub fn has_connections(&self) -> bool {
        !self.connection_ids.is_empty()
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.last_seen = chrono::Utc::now().timestamp();
    }
}

/// Typing indicator data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingData {
    /// User ID who is typing
    pub user_id: Snowflake,
    /// Conversation the user is typing in
    pub conversation_id: Snowflake,
    /// Typing start timestamp (unix seconds)
    pub started_at: i64,
}

impl TypingData {
    /// Create a new typing indicator
    #[must_use]
    pub fn new(user_id: Snowflake, conversation_id: Snowflake) -> Self {
        Self {
            user_id,
            conversation_id,
            started_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Presence store interface
///
/// Typing indicators decay on their own after the store's TTL; `remove_typing`
/// only clears them early. Unread counters are a cache: absence means
/// "not cached", never zero.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// Store a user's presence record
    async fn set_presence(&self, presence: &PresenceData) -> RepoResult<()>;

    /// Get a user's presence record
    async fn get_presence(&self, user_id: Snowflake) -> RepoResult<Option<PresenceData>>;

    /// Remove a user's presence record
    async fn remove_presence(&self, user_id: Snowflake) -> RepoResult<bool>;

    /// Refresh the presence record and its TTL on user activity
    async fn refresh_presence(&self, user_id: Snowflake) -> RepoResult<bool>;

    /// Check if a user is online
    async fn is_online(&self, user_id: Snowflake) -> RepoResult<bool>;

    /// Add a user to the global online set
    async fn add_online_user(&self, user_id: Snowflake) -> RepoResult<()>;

    /// Remove a user from the global online set
    async fn remove_online_user(&self, user_id: Snowflake) -> RepoResult<()>;

    /// Get all online user IDs
    async fn get_online_users(&self) -> RepoResult<Vec<Snowflake>>;

    /// Set a typing indicator (TTL-bound)
    async fn set_typing(&self, typing: &TypingData) -> RepoResult<()>;

    /// Remove a typing indicator before it decays
    async fn remove_typing(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool>;

    /// Get all users currently typing in a conversation
    async fn get_typing_users(&self, conversation_id: Snowflake) -> RepoResult<Vec<TypingData>>;

    /// Cache an unread counter
    async fn set_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
        count: i64,
    ) -> RepoResult<()>;

    /// Get a cached unread counter, if present
    async fn get_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> RepoResult<Option<i64>>;

    /// Increment a cached unread counter and return the new value
    async fn incr_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> RepoResult<i64>;

    /// Drop a cached unread counter (invalidation on read-marker moves)
    async fn clear_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> RepoResult<bool>;

    /// Liveness probe for the store
    async fn health_check(&self) -> RepoResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_data_connections() {
        let user_id = Snowflake::new(12345);
        let mut presence = PresenceData::new(user_id, "conn-1".to_string());

        assert_eq!(presence.user_id, user_id);
        assert!(presence.has_connections());

        presence.add_connection("conn-2".to_string());
        presence.add_connection("conn-2".to_string());
        assert_eq!(presence.connection_ids.len(), 2);

        presence.remove_connection("conn-1");
        presence.remove_connection("conn-2");
        assert!(!presence.has_connections());
    }

    #[test]
    fn test_typing_data_creation() {
        let user_id = Snowflake::new(12345);
        let conversation_id = Snowflake::new(67890);

        let typing = TypingData::new(user_id, conversation_id);

        assert_eq!(typing.user_id, user_id);
        assert_eq!(typing.conversation_id, conversation_id);
        assert!(typing.started_at > 0);
    }
}

//! Redis implementation of the presence store.
//!
//! Tracks per-user presence records, the global online set, ephemeral
//! typing indicators, and cached unread counters.

use async_trait::async_trait;
use redis::AsyncCommands;

use parley_core::error::DomainError;
use parley_core::traits::{PresenceData, PresenceStore, RepoResult, TypingData};
use parley_core::Snowflake;

use crate::pool::RedisPool;

/// Key prefix for user presence
const PRESENCE_PREFIX: &str = "presence:";
/// Key prefix for typing indicators
const TYPING_PREFIX: &str = "typing:";
/// Key prefix for cached unread counters
const UNREAD_PREFIX: &str = "unread:";
/// Set of currently online user IDs
const ONLINE_USERS_KEY: &str = "online_users";

/// Presence TTL (5 minutes - refreshed by client activity)
pub const PRESENCE_TTL: u64 = 300;
/// Typing indicator TTL (8 seconds - a stopped client simply decays)
pub const TYPING_TTL: u64 = 8;

fn map_cache_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::CacheError(e.to_string())
}

/// Redis-backed presence store
#[derive(Clone)]
pub struct RedisPresenceStore {
    pool: RedisPool,
}

impl RedisPresenceStore {
    /// Create a new presence store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Generate Redis key for user presence
    fn presence_key(user_id: Snowflake) -> String {
        format!("{PRESENCE_PREFIX}{user_id}")
    }

    /// Generate Redis key for a typing indicator
    fn typing_key(conversation_id: Snowflake, user_id: Snowflake) -> String {
        format!("{TYPING_PREFIX}{conversation_id}:{user_id}")
    }

    /// Generate Redis key for a cached unread counter
    fn unread_key(user_id: Snowflake, conversation_id: Snowflake) -> String {
        format!("{UNREAD_PREFIX}{user_id}:{conversation_id}")
    }
}

#[async_trait]
impl PresenceStore for RedisPresenceStore {
    async fn set_presence(&self, presence: &PresenceData) -> RepoResult<()> {
        let key = Self::presence_key(presence.user_id);
        self.pool
            .set(&key, presence, Some(PRESENCE_TTL))
            .await
            .map_err(map_cache_err)?;

        tracing::debug!(
            user_id = %presence.user_id,
            connections = presence.connection_ids.len(),
            "Set user presence"
        );

        Ok(())
    }

    async fn get_presence(&self, user_id: Snowflake) -> RepoResult<Option<PresenceData>> {
        let key = Self::presence_key(user_id);
        self.pool.get_value(&key).await.map_err(map_cache_err)
    }

    async fn remove_presence(&self, user_id: Snowflake) -> RepoResult<bool> {
        let key = Self::presence_key(user_id);
        self.pool.delete(&key).await.map_err(map_cache_err)
    }

    async fn refresh_presence(&self, user_id: Snowflake) -> RepoResult<bool> {
        if let Some(mut presence) = self.get_presence(user_id).await? {
            presence.touch();
            self.set_presence(&presence).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn is_online(&self, user_id: Snowflake) -> RepoResult<bool> {
        let key = Self::presence_key(user_id);
        self.pool.exists(&key).await.map_err(map_cache_err)
    }

    async fn add_online_user(&self, user_id: Snowflake) -> RepoResult<()> {
        let mut conn = self.pool.get().await.map_err(map_cache_err)?;
        conn.sadd::<_, _, ()>(ONLINE_USERS_KEY, user_id.to_string())
            .await
            .map_err(map_cache_err)?;
        Ok(())
    }

    async fn remove_online_user(&self, user_id: Snowflake) -> RepoResult<()> {
        let mut conn = self.pool.get().await.map_err(map_cache_err)?;
        conn.srem::<_, _, ()>(ONLINE_USERS_KEY, user_id.to_string())
            .await
            .map_err(map_cache_err)?;
        Ok(())
    }

    async fn get_online_users(&self) -> RepoResult<Vec<Snowflake>> {
        let mut conn = self.pool.get().await.map_err(map_cache_err)?;
        let user_ids: Vec<String> = conn
            .smembers(ONLINE_USERS_KEY)
            .await
            .map_err(map_cache_err)?;

        let mut result = Vec::new();
        for id_str in user_ids {
            if let Ok(id) = id_str.parse::<i64>() {
                result.push(Snowflake::from(id));
            }
        }
        Ok(result)
    }

    async fn set_typing(&self, typing: &TypingData) -> RepoResult<()> {
        let key = Self::typing_key(typing.conversation_id, typing.user_id);
        self.pool
            .set(&key, typing, Some(TYPING_TTL))
            .await
            .map_err(map_cache_err)?;

        tracing::trace!(
            user_id = %typing.user_id,
            conversation_id = %typing.conversation_id,
            "Set typing indicator"
        );

        Ok(())
    }

    async fn remove_typing(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        let key = Self::typing_key(conversation_id, user_id);
        self.pool.delete(&key).await.map_err(map_cache_err)
    }

    async fn get_typing_users(&self, conversation_id: Snowflake) -> RepoResult<Vec<TypingData>> {
        let pattern = format!("{TYPING_PREFIX}{conversation_id}:*");
        let keys = self
            .pool
            .scan_keys(&pattern, 100)
            .await
            .map_err(map_cache_err)?;

        let mut typing = Vec::new();
        for key in keys {
            if let Some(data) = self
                .pool
                .get_value::<TypingData>(&key)
                .await
                .map_err(map_cache_err)?
            {
                typing.push(data);
            }
        }

        Ok(typing)
    }

    async fn set_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
        count: i64,
    ) -> RepoResult<()> {
        let key = Self::unread_key(user_id, conversation_id);
        let mut conn = self.pool.get().await.map_err(map_cache_err)?;
        conn.set::<_, _, ()>(&key, count)
            .await
            .map_err(map_cache_err)?;
        Ok(())
    }

    async fn get_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> RepoResult<Option<i64>> {
        let key = Self::unread_key(user_id, conversation_id);
        let mut conn = self.pool.get().await.map_err(map_cache_err)?;
        let count: Option<i64> = conn.get(&key).await.map_err(map_cache_err)?;
        Ok(count)
    }

    async fn incr_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> RepoResult<i64> {
        let key = Self::unread_key(user_id, conversation_id);
        let mut conn = self.pool.get().await.map_err(map_cache_err)?;
        let count: i64 = conn.incr(&key, 1).await.map_err(map_cache_err)?;
        Ok(count)
    }

    async fn clear_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> RepoResult<bool> {
        let key = Self::unread_key(user_id, conversation_id);
        self.pool.delete(&key).await.map_err(map_cache_err)
    }

    async fn health_check(&self) -> RepoResult<()> {
        self.pool.health_check().await.map_err(map_cache_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let user_id = Snowflake::from(12345i64);
        let conversation_id = Snowflake::from(67890i64);

        assert_eq!(
            RedisPresenceStore::presence_key(user_id),
            format!("presence:{user_id}")
        );
        assert_eq!(
            RedisPresenceStore::typing_key(conversation_id, user_id),
            format!("typing:{conversation_id}:{user_id}")
        );
        assert_eq!(
            RedisPresenceStore::unread_key(user_id, conversation_id),
            format!("unread:{user_id}:{conversation_id}")
        );
    }
}

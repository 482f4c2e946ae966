//! Presence service
//!
//! Wraps the Redis presence store with the online/offline lifecycle,
//! typing indicators, and unread counter helpers.
//!
//! Read paths degrade softly: a store error is logged at warn and reported
//! as offline/empty/unknown. Write paths propagate, so callers notice a
//! presence layer that stopped accepting updates.

use parley_core::traits::{PresenceData, TypingData};
use parley_core::Snowflake;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a user coming online on a connection
    ///
    /// Idempotent: a second call with the same connection refreshes
    /// last_seen without duplicating the connection entry.
    #[instrument(skip(self))]
    pub async fn set_online(
        &self,
        user_id: Snowflake,
        connection_id: &str,
    ) -> ServiceResult<()> {
        let store = self.ctx.presence_store();

        let presence = match store
            .get_presence(user_id)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to read presence: {e}")))?
        {
            Some(mut presence) => {
                presence.add_connection(connection_id.to_string());
                presence.touch();
                presence
            }
            None => PresenceData::new(user_id, connection_id.to_string()),
        };

        store
            .set_presence(&presence)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to set presence: {e}")))?;
        store
            .add_online_user(user_id)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to update online set: {e}")))?;

        info!(user_id = %user_id, connection_id, "User online");

        Ok(())
    }

    /// Record a user going fully offline
    ///
    /// Called by the gateway when the user's last connection drops.
    #[instrument(skip(self))]
    pub async fn set_offline(&self, user_id: Snowflake) -> ServiceResult<()> {
        let store = self.ctx.presence_store();

        store
            .remove_presence(user_id)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to remove presence: {e}")))?;
        store
            .remove_online_user(user_id)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to update online set: {e}")))?;

        info!(user_id = %user_id, "User offline");

        Ok(())
    }

    /// Prune a dropped connection from the user's presence record
    ///
    /// Called by the gateway when one of several connections drops; the
    /// record stays alive for the rest. Falls through to offline when the
    /// dropped connection was the last one on record.
    #[instrument(skip(self))]
    pub async fn drop_connection(
        &self,
        user_id: Snowflake,
        connection_id: &str,
    ) -> ServiceResult<()> {
        let store = self.ctx.presence_store();

        let Some(mut presence) = store
            .get_presence(user_id)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to read presence: {e}")))?
        else {
            return Ok(());
        };

        presence.remove_connection(connection_id);

        if presence.has_connections() {
            presence.touch();
            store
                .set_presence(&presence)
                .await
                .map_err(|e| ServiceError::internal(format!("Failed to set presence: {e}")))?;
        } else {
            self.set_offline(user_id).await?;
        }

        Ok(())
    }

    /// Refresh last_seen and the presence TTL
    #[instrument(skip(self))]
    pub async fn update_last_seen(&self, user_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .presence_store()
            .refresh_presence(user_id)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to refresh presence: {e}")))?;
        Ok(())
    }

    /// Check if a user is online; unknown on store failure means offline
    #[instrument(skip(self))]
    pub async fn is_online(&self, user_id: Snowflake) -> bool {
        match self.ctx.presence_store().is_online(user_id).await {
            Ok(online) => online,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Presence read failed, reporting offline");
                false
            }
        }
    }

    /// Filter a set of user IDs down to the ones currently online
    ///
    /// Fails soft: a store error yields an empty set.
    #[instrument(skip(self, user_ids))]
    pub async fn get_online_users(&self, user_ids: &[Snowflake]) -> Vec<Snowflake> {
        match self.ctx.presence_store().get_online_users().await {
            Ok(online) => user_ids
                .iter()
                .copied()
                .filter(|id| online.contains(id))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Online set read failed, reporting nobody online");
                Vec::new()
            }
        }
    }

    /// Get every user currently online
    #[instrument(skip(self))]
    pub async fn get_all_online_users(&self) -> ServiceResult<Vec<Snowflake>> {
        self.ctx
            .presence_store()
            .get_online_users()
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to read online set: {e}")))
    }

    /// Mark a user as typing in a conversation (TTL-bound)
    #[instrument(skip(self))]
    pub async fn start_typing(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> ServiceResult<()> {
        let typing = TypingData::new(user_id, conversation_id);
        self.ctx
            .presence_store()
            .set_typing(&typing)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to set typing: {e}")))?;
        Ok(())
    }

    /// Clear a user's typing indicator early
    #[instrument(skip(self))]
    pub async fn stop_typing(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> ServiceResult<()> {
        self.ctx
            .presence_store()
            .remove_typing(conversation_id, user_id)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to clear typing: {e}")))?;
        Ok(())
    }

    /// Get users currently typing in a conversation; fails soft
    #[instrument(skip(self))]
    pub async fn get_typing_users(&self, conversation_id: Snowflake) -> Vec<Snowflake> {
        match self
            .ctx
            .presence_store()
            .get_typing_users(conversation_id)
            .await
        {
            Ok(typing) => typing.into_iter().map(|t| t.user_id).collect(),
            Err(e) => {
                warn!(conversation_id = %conversation_id, error = %e, "Typing read failed");
                Vec::new()
            }
        }
    }

    /// Cache an unread counter for a user/conversation pair
    #[instrument(skip(self))]
    pub async fn cache_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
        count: i64,
    ) -> ServiceResult<()> {
        self.ctx
            .presence_store()
            .set_unread_count(user_id, conversation_id, count)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to cache unread count: {e}")))?;
        Ok(())
    }

    /// Get a cached unread counter
    ///
    /// `None` means "not cached", never zero; callers fall back to the
    /// database to compute a fresh value.
    #[instrument(skip(self))]
    pub async fn get_cached_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> ServiceResult<Option<i64>> {
        self.ctx
            .presence_store()
            .get_unread_count(user_id, conversation_id)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to read unread count: {e}")))
    }

    /// Drop a cached unread counter
    #[instrument(skip(self))]
    pub async fn clear_unread_count(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> ServiceResult<()> {
        self.ctx
            .presence_store()
            .clear_unread_count(user_id, conversation_id)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to clear unread count: {e}")))?;
        Ok(())
    }

    /// Liveness probe for the presence layer
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> bool {
        match self.ctx.presence_store().health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Presence store health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHarness;
    use parley_cache::TYPING_TTL;
    use std::time::Duration;

    #[tokio::test]
    async fn test_online_lifecycle() {
        let harness = TestHarness::new();
        let service = PresenceService::new(harness.ctx());
        let user = Snowflake::new(1);

        assert!(!service.is_online(user).await);

        service.set_online(user, "conn-1").await.unwrap();
        assert!(service.is_online(user).await);

        service.set_offline(user).await.unwrap();
        assert!(!service.is_online(user).await);
    }

    #[tokio::test]
    async fn test_get_online_users_filters_to_online_subset() {
        let harness = TestHarness::new();
        let service = PresenceService::new(harness.ctx());

        service.set_online(Snowflake::new(1), "c1").await.unwrap();
        service.set_online(Snowflake::new(2), "c1").await.unwrap();

        let online = service
            .get_online_users(&[Snowflake::new(1), Snowflake::new(3)])
            .await;
        assert_eq!(online, vec![Snowflake::new(1)]);
    }

    // One of several connections dropping must not flip the user offline;
    // only the last one does.
    #[tokio::test]
    async fn test_drop_connection_keeps_user_online_until_last() {
        let harness = TestHarness::new();
        let service = PresenceService::new(harness.ctx());
        let user = Snowflake::new(1);

        service.set_online(user, "conn-1").await.unwrap();
        service.set_online(user, "conn-2").await.unwrap();

        service.drop_connection(user, "conn-1").await.unwrap();
        assert!(service.is_online(user).await);

        let presence = harness.presence.presence_record(user).unwrap();
        assert_eq!(presence.connection_ids, vec!["conn-2".to_string()]);

        service.drop_connection(user, "conn-2").await.unwrap();
        assert!(!service.is_online(user).await);
        assert!(service.get_online_users(&[user]).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_indicator_decays_without_stop() {
        let harness = TestHarness::new();
        let service = PresenceService::new(harness.ctx());
        let user = Snowflake::new(1);
        let conversation = Snowflake::new(9);

        service.start_typing(user, conversation).await.unwrap();
        assert_eq!(service.get_typing_users(conversation).await, vec![user]);

        tokio::time::advance(Duration::from_secs(TYPING_TTL + 1)).await;
        assert!(service.get_typing_users(conversation).await.is_empty());
    }

    #[tokio::test]
    async fn test_stop_typing_clears_early() {
        let harness = TestHarness::new();
        let service = PresenceService::new(harness.ctx());
        let user = Snowflake::new(1);
        let conversation = Snowflake::new(9);

        service.start_typing(user, conversation).await.unwrap();
        service.stop_typing(user, conversation).await.unwrap();
        assert!(service.get_typing_users(conversation).await.is_empty());
    }

    #[tokio::test]
    async fn test_reads_fail_soft_when_store_is_down() {
        let harness = TestHarness::new();
        let service = PresenceService::new(harness.ctx());
        harness.presence.set_down(true);

        assert!(!service.is_online(Snowflake::new(1)).await);
        assert!(service
            .get_online_users(&[Snowflake::new(1), Snowflake::new(2)])
            .await
            .is_empty());
        assert!(service.get_typing_users(Snowflake::new(9)).await.is_empty());
        assert!(!service.health_check().await);
    }

    #[tokio::test]
    async fn test_writes_propagate_when_store_is_down() {
        let harness = TestHarness::new();
        let service = PresenceService::new(harness.ctx());
        harness.presence.set_down(true);

        let err = service.set_online(Snowflake::new(1), "conn-1").await;
        assert!(err.is_err());

        let err = service
            .start_typing(Snowflake::new(1), Snowflake::new(2))
            .await;
        assert!(err.is_err());
    }
}

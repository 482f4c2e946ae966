//! Reaction service
//!
//! Handles adding and removing emoji reactions, plus the notification
//! fan-out to the message author.

use chrono::Utc;
use parley_core::entities::Reaction;
use parley_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::ReactionResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationProducer;

/// Preview length carried in reaction notifications
const NOTIFICATION_PREVIEW_LEN: usize = 80;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a reaction to a message
    ///
    /// The caller must participate in the message's conversation. A
    /// duplicate (message, user, emoji) surfaces as a conflict; the unique
    /// constraint resolves concurrent double-taps. On success a notification
    /// for the message author is fired off-path.
    #[instrument(skip(self))]
    pub async fn add_reaction(
        &self,
        user_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> ServiceResult<ReactionResponse> {
        if emoji.trim().is_empty() {
            return Err(ServiceError::validation("Emoji must not be empty"));
        }

        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if !self
            .ctx
            .participant_repo()
            .is_participant(message.conversation_id, user_id)
            .await?
        {
            return Err(DomainError::NotParticipant {
                user_id,
                conversation_id: message.conversation_id,
            }
            .into());
        }

        let reaction = Reaction {
            message_id,
            user_id,
            emoji: emoji.to_string(),
            created_at: Utc::now(),
        };

        self.ctx.reaction_repo().create(&reaction).await?;

        info!(message_id = %message_id, user_id = %user_id, emoji, "Reaction added");

        let actor_name = match self.ctx.user_repo().find_by_id(user_id).await? {
            Some(actor) => actor.display_name,
            None => user_id.to_string(),
        };

        NotificationProducer::new(self.ctx).send_reaction_notification(
            user_id,
            message.sender_id,
            message_id,
            emoji,
            actor_name,
            message.preview(NOTIFICATION_PREVIEW_LEN).to_string(),
        );

        Ok(ReactionResponse::from(&reaction))
    }

    /// Remove a reaction from a message
    #[instrument(skip(self))]
    pub async fn remove_reaction(
        &self,
        user_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> ServiceResult<()> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if !self
            .ctx
            .participant_repo()
            .is_participant(message.conversation_id, user_id)
            .await?
        {
            return Err(DomainError::NotParticipant {
                user_id,
                conversation_id: message.conversation_id,
            }
            .into());
        }

        self.ctx
            .reaction_repo()
            .delete(message_id, user_id, emoji)
            .await?;

        info!(message_id = %message_id, user_id = %user_id, emoji, "Reaction removed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::SendMessageRequest;
    use crate::services::MessagingService;
    use crate::test_support::{sample_user, TestHarness};
    use parley_core::entities::Participant;
    use parley_core::traits::NotificationJob;

    async fn seed_message(harness: &TestHarness) -> (Snowflake, Snowflake, Snowflake) {
        let (author, conversation) = harness.seed_conversation_with_user(1);
        let response = MessagingService::new(harness.ctx())
            .save_message(
                author.id,
                SendMessageRequest {
                    conversation_id: conversation,
                    content: Some("react to me".to_string()),
                    attachment_url: None,
                },
            )
            .await
            .unwrap();
        (author.id, conversation, response.id.parse().unwrap())
    }

    #[tokio::test]
    async fn test_add_reaction_notifies_author() {
        let harness = TestHarness::new();
        let (author_id, conversation, message_id) = seed_message(&harness).await;

        let reactor = sample_user(2);
        harness.users.insert(reactor.clone());
        harness.participants.insert(Participant {
            conversation_id: conversation,
            user_id: reactor.id,
            joined_at: chrono::Utc::now(),
            last_read_message_id: None,
        });

        let service = ReactionService::new(harness.ctx());
        let response = service
            .add_reaction(reactor.id, message_id, "👍")
            .await
            .unwrap();
        assert_eq!(response.emoji, "👍");

        let jobs = harness.queue.wait_for_jobs(1).await;
        match &jobs[0] {
            NotificationJob::ReactionReceived {
                actor_id,
                recipient_id,
                emoji,
                message_preview,
                ..
            } => {
                assert_eq!(*actor_id, reactor.id);
                assert_eq!(*recipient_id, author_id);
                assert_eq!(emoji, "👍");
                assert_eq!(message_preview, "react to me");
            }
        }
    }

    #[tokio::test]
    async fn test_self_reaction_is_not_notified() {
        let harness = TestHarness::new();
        let (author_id, _, message_id) = seed_message(&harness).await;

        let service = ReactionService::new(harness.ctx());
        service
            .add_reaction(author_id, message_id, "🎉")
            .await
            .unwrap();

        // give any wrongly spawned task a chance to run
        tokio::task::yield_now().await;
        assert!(harness.queue.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_reaction_conflicts() {
        let harness = TestHarness::new();
        let (_, conversation, message_id) = seed_message(&harness).await;

        let reactor = sample_user(2);
        harness.users.insert(reactor.clone());
        harness.participants.insert(Participant {
            conversation_id: conversation,
            user_id: reactor.id,
            joined_at: chrono::Utc::now(),
            last_read_message_id: None,
        });

        let service = ReactionService::new(harness.ctx());
        service
            .add_reaction(reactor.id, message_id, "👍")
            .await
            .unwrap();

        let err = service
            .add_reaction(reactor.id, message_id, "👍")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "REACTION_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_add_reaction_requires_participancy() {
        let harness = TestHarness::new();
        let (_, _, message_id) = seed_message(&harness).await;

        let outsider = sample_user(50);
        harness.users.insert(outsider.clone());

        let service = ReactionService::new(harness.ctx());
        let err = service
            .add_reaction(outsider.id, message_id, "👍")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_PARTICIPANT");
    }

    #[tokio::test]
    async fn test_remove_reaction_roundtrip() {
        let harness = TestHarness::new();
        let (author_id, _, message_id) = seed_message(&harness).await;

        let service = ReactionService::new(harness.ctx());
        service
            .add_reaction(author_id, message_id, "👍")
            .await
            .unwrap();
        service
            .remove_reaction(author_id, message_id, "👍")
            .await
            .unwrap();

        // removing again is a no-op, not an error
        service
            .remove_reaction(author_id, message_id, "👍")
            .await
            .unwrap();
    }
}

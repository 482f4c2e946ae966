//! Messaging service
//!
//! Handles message persistence, conversation hydration, history queries,
//! and read markers.

use std::collections::HashMap;

use parley_core::entities::Message;
use parley_core::traits::{MessageQuery, MessageWithSender};
use parley_core::{DomainError, Snowflake};
use tracing::{info, instrument, trace, warn};
use validator::Validate;

use crate::dto::{
    ConversationView, ConversationWithDetails, MessageResponse, ReadMarkerResponse,
    SendMessageRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// How many recent messages to hydrate per conversation
const RECENT_MESSAGE_WINDOW: i64 = 20;

/// Messaging service
pub struct MessagingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessagingService<'a> {
    /// Create a new MessagingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check whether a user participates in a conversation
    ///
    /// Pure read with no side effects; the gateway uses this as the
    /// room-join authorization gate.
    #[instrument(skip(self))]
    pub async fn is_participant(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> ServiceResult<bool> {
        let result = self
            .ctx
            .participant_repo()
            .is_participant(conversation_id, user_id)
            .await?;
        Ok(result)
    }

    /// Persist a message and return it joined with the sender's profile
    ///
    /// Validation runs before any store access; the participancy gate runs
    /// before anything is persisted.
    #[instrument(skip(self, request))]
    pub async fn save_message(
        &self,
        sender_id: Snowflake,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let conversation_id = request.conversation_id;
        let message = Message::new(
            self.ctx.generate_id(),
            conversation_id,
            sender_id,
            request.content,
            request.attachment_url,
        );

        if !message.has_body() {
            return Err(DomainError::MissingContent.into());
        }

        if !self
            .ctx
            .participant_repo()
            .is_participant(conversation_id, sender_id)
            .await?
        {
            return Err(DomainError::NotParticipant {
                user_id: sender_id,
                conversation_id,
            }
            .into());
        }

        self.ctx.message_repo().create(&message).await?;
        self.ctx.conversation_repo().touch(conversation_id).await?;

        let sender = self
            .ctx
            .user_repo()
            .find_by_id(sender_id)
            .await?
            .ok_or_else(|| ServiceError::internal("Sender profile missing"))?;

        info!(
            message_id = %message.id,
            conversation_id = %conversation_id,
            "Message saved"
        );

        self.bump_unread_counters(&message).await;

        Ok(MessageResponse::from(MessageWithSender { message, sender }))
    }

    /// List a user's conversations, hydrated for the `ready` payload
    ///
    /// Each conversation carries its profile-joined participant list and a
    /// bounded window of most recent messages, ordered by recency.
    #[instrument(skip(self))]
    pub async fn get_user_conversations(
        &self,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<ConversationView>> {
        let conversations = self.ctx.conversation_repo().find_by_user(user_id).await?;

        let mut views = Vec::with_capacity(conversations.len());

        for conversation in conversations {
            let participants = self
                .ctx
                .participant_repo()
                .find_by_conversation(conversation.id)
                .await?;

            let user_ids: Vec<Snowflake> = participants.iter().map(|p| p.user_id).collect();
            let profiles: HashMap<Snowflake, _> = self
                .ctx
                .user_repo()
                .find_by_ids(&user_ids)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect();

            let joined = participants
                .into_iter()
                .filter_map(|p| profiles.get(&p.user_id).cloned().map(|u| (p, u)))
                .collect();

            let recent_messages = self
                .ctx
                .message_repo()
                .find_by_conversation(
                    conversation.id,
                    MessageQuery {
                        before: None,
                        limit: RECENT_MESSAGE_WINDOW,
                    },
                )
                .await?;

            views.push(ConversationView::from(ConversationWithDetails {
                conversation,
                participants: joined,
                recent_messages,
            }));
        }

        Ok(views)
    }

    /// Get message history for a conversation, newest first
    ///
    /// Callers that render chronologically reverse the page client-side.
    #[instrument(skip(self))]
    pub async fn get_messages(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
        before: Option<Snowflake>,
        limit: i64,
    ) -> ServiceResult<Vec<MessageResponse>> {
        if !self
            .ctx
            .participant_repo()
            .is_participant(conversation_id, user_id)
            .await?
        {
            return Err(DomainError::NotParticipant {
                user_id,
                conversation_id,
            }
            .into());
        }

        let messages = self
            .ctx
            .message_repo()
            .find_by_conversation(
                conversation_id,
                MessageQuery {
                    before,
                    limit: limit.min(100),
                },
            )
            .await?;

        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    /// Move a user's read marker, forward only
    ///
    /// A marker never moves backwards: pointing at an older-or-equal message
    /// is a no-op that still reports the marker currently in effect.
    /// Snowflake order is creation order, so the comparison is a plain ID
    /// comparison.
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        user_id: Snowflake,
        conversation_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<ReadMarkerResponse> {
        let participant = self
            .ctx
            .participant_repo()
            .find(conversation_id, user_id)
            .await?
            .ok_or(DomainError::NotParticipant {
                user_id,
                conversation_id,
            })?;

        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .filter(|m| m.conversation_id == conversation_id)
            .ok_or(DomainError::MessageNotFound(message_id))?;

        let marker = if participant.advances_read_marker(message.id) {
            self.ctx
                .participant_repo()
                .update_last_read(conversation_id, user_id, message.id)
                .await?;

            // Cached counter is stale now; drop it rather than recompute
            if let Err(e) = self
                .ctx
                .presence_store()
                .clear_unread_count(user_id, conversation_id)
                .await
            {
                warn!(user_id = %user_id, error = %e, "Failed to clear unread counter");
            }

            info!(
                user_id = %user_id,
                conversation_id = %conversation_id,
                message_id = %message.id,
                "Read marker advanced"
            );

            message.id
        } else {
            participant.last_read_message_id.unwrap_or(message.id)
        };

        Ok(ReadMarkerResponse {
            conversation_id: conversation_id.to_string(),
            user_id: user_id.to_string(),
            message_id: marker.to_string(),
        })
    }

    /// Bump cached unread counters for the other participants, best effort
    ///
    /// Only counters already cached are touched; absence means "not cached",
    /// never zero. Store failures are swallowed.
    async fn bump_unread_counters(&self, message: &Message) {
        let participants = match self
            .ctx
            .participant_repo()
            .find_by_conversation(message.conversation_id)
            .await
        {
            Ok(participants) => participants,
            Err(e) => {
                trace!(error = %e, "Skipping unread counter bump");
                return;
            }
        };

        let store = self.ctx.presence_store();
        for participant in participants {
            if participant.user_id == message.sender_id {
                continue;
            }

            match store
                .get_unread_count(participant.user_id, message.conversation_id)
                .await
            {
                Ok(Some(_)) => {
                    if let Err(e) = store
                        .incr_unread_count(participant.user_id, message.conversation_id)
                        .await
                    {
                        trace!(user_id = %participant.user_id, error = %e, "Unread bump failed");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    trace!(user_id = %participant.user_id, error = %e, "Unread bump failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_user, TestHarness};
    use parley_core::entities::Participant;

    fn send_request(conversation_id: Snowflake, content: &str) -> SendMessageRequest {
        SendMessageRequest {
            conversation_id,
            content: Some(content.to_string()),
            attachment_url: None,
        }
    }

    #[tokio::test]
    async fn test_save_message_requires_body() {
        let harness = TestHarness::new();
        let (user, conversation) = harness.seed_conversation_with_user(1);

        let service = MessagingService::new(harness.ctx());
        let err = service
            .save_message(
                user.id,
                SendMessageRequest {
                    conversation_id: conversation,
                    content: Some("   ".to_string()),
                    attachment_url: None,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "MISSING_CONTENT");
        // nothing persisted
        assert_eq!(harness.messages.message_count(), 0);
    }

    #[tokio::test]
    async fn test_save_message_rejects_non_participant() {
        let harness = TestHarness::new();
        let (_, conversation) = harness.seed_conversation_with_user(1);
        let outsider = sample_user(99);
        harness.users.insert(outsider.clone());

        let service = MessagingService::new(harness.ctx());
        let err = service
            .save_message(outsider.id, send_request(conversation, "hello"))
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "NOT_PARTICIPANT");
        assert_eq!(harness.messages.message_count(), 0);
    }

    #[tokio::test]
    async fn test_save_message_returns_joined_sender_and_touches_conversation() {
        let harness = TestHarness::new();
        let (user, conversation) = harness.seed_conversation_with_user(1);

        let service = MessagingService::new(harness.ctx());
        let response = service
            .save_message(user.id, send_request(conversation, "hello"))
            .await
            .unwrap();

        assert_eq!(response.sender.id, user.id.to_string());
        assert_eq!(response.sender.handle, user.handle);
        assert_eq!(response.content.as_deref(), Some("hello"));
        assert_eq!(harness.conversations.touch_count(conversation), 1);
    }

    #[tokio::test]
    async fn test_get_messages_newest_first() {
        let harness = TestHarness::new();
        let (user, conversation) = harness.seed_conversation_with_user(1);

        let service = MessagingService::new(harness.ctx());
        for text in ["first", "second", "third"] {
            service
                .save_message(user.id, send_request(conversation, text))
                .await
                .unwrap();
        }

        let page = service
            .get_messages(conversation, user.id, None, 50)
            .await
            .unwrap();

        let contents: Vec<_> = page.iter().map(|m| m.content.as_deref().unwrap()).collect();
        assert_eq!(contents, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_get_messages_requires_participancy() {
        let harness = TestHarness::new();
        let (_, conversation) = harness.seed_conversation_with_user(1);

        let service = MessagingService::new(harness.ctx());
        let err = service
            .get_messages(conversation, Snowflake::new(404), None, 50)
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "NOT_PARTICIPANT");
    }

    #[tokio::test]
    async fn test_mark_read_is_monotonic_forward_only() {
        let harness = TestHarness::new();
        let (user, conversation) = harness.seed_conversation_with_user(1);

        let service = MessagingService::new(harness.ctx());
        let first = service
            .save_message(user.id, send_request(conversation, "a"))
            .await
            .unwrap();
        let second = service
            .save_message(user.id, send_request(conversation, "b"))
            .await
            .unwrap();

        let marker = service
            .mark_read(user.id, conversation, second.id.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(marker.message_id, second.id);

        // moving backwards is a no-op that reports the current marker
        let marker = service
            .mark_read(user.id, conversation, first.id.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(marker.message_id, second.id);
    }

    #[tokio::test]
    async fn test_mark_read_rejects_foreign_message() {
        let harness = TestHarness::new();
        let (user, conversation) = harness.seed_conversation_with_user(1);
        let (other_user, other_conversation) = harness.seed_conversation_with_user(2);

        let service = MessagingService::new(harness.ctx());
        let foreign = service
            .save_message(other_user.id, send_request(other_conversation, "elsewhere"))
            .await
            .unwrap();

        let err = service
            .mark_read(user.id, conversation, foreign.id.parse().unwrap())
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "UNKNOWN_MESSAGE");
    }

    #[tokio::test]
    async fn test_get_user_conversations_excludes_foreign_conversations() {
        let harness = TestHarness::new();
        let (user, conversation) = harness.seed_conversation_with_user(1);
        // a conversation the user has no part in
        let (_, foreign) = harness.seed_conversation_with_user(2);

        let service = MessagingService::new(harness.ctx());
        let views = service.get_user_conversations(user.id).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, conversation.to_string());
        assert_ne!(views[0].id, foreign.to_string());
    }

    #[tokio::test]
    async fn test_get_user_conversations_hydrates_participants_and_recent() {
        let harness = TestHarness::new();
        let (user, conversation) = harness.seed_conversation_with_user(1);
        let friend = sample_user(2);
        harness.users.insert(friend.clone());
        harness.participants.insert(Participant {
            conversation_id: conversation,
            user_id: friend.id,
            joined_at: chrono::Utc::now(),
            last_read_message_id: None,
        });

        let service = MessagingService::new(harness.ctx());
        service
            .save_message(user.id, send_request(conversation, "hello"))
            .await
            .unwrap();

        let views = service.get_user_conversations(user.id).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].participants.len(), 2);
        assert_eq!(views[0].recent_messages.len(), 1);
        assert_eq!(
            views[0].recent_messages[0].content.as_deref(),
            Some("hello")
        );
    }
}

//! Mappers from domain entities to response DTOs

use parley_core::entities::{Conversation, Participant, Reaction, User};
use parley_core::traits::MessageWithSender;

use super::responses::{
    ConversationView, MessageResponse, ParticipantView, ReactionResponse, UserResponse,
};

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            handle: user.handle.clone(),
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<MessageWithSender> for MessageResponse {
    fn from(joined: MessageWithSender) -> Self {
        Self {
            id: joined.message.id.to_string(),
            conversation_id: joined.message.conversation_id.to_string(),
            sender: UserResponse::from(&joined.sender),
            content: joined.message.content,
            attachment_url: joined.message.attachment_url,
            created_at: joined.message.created_at,
        }
    }
}

impl From<&Reaction> for ReactionResponse {
    fn from(reaction: &Reaction) -> Self {
        Self {
            message_id: reaction.message_id.to_string(),
            user_id: reaction.user_id.to_string(),
            emoji: reaction.emoji.clone(),
            created_at: reaction.created_at,
        }
    }
}

/// Aggregate used to assemble a `ConversationView`
#[derive(Debug, Clone)]
pub struct ConversationWithDetails {
    pub conversation: Conversation,
    /// Participants paired with their profiles
    pub participants: Vec<(Participant, User)>,
    /// Most recent messages, newest first
    pub recent_messages: Vec<MessageWithSender>,
}

impl From<ConversationWithDetails> for ConversationView {
    fn from(details: ConversationWithDetails) -> Self {
        Self {
            id: details.conversation.id.to_string(),
            created_at: details.conversation.created_at,
            updated_at: details.conversation.updated_at,
            participants: details
                .participants
                .into_iter()
                .map(|(participant, user)| ParticipantView {
                    user: UserResponse::from(&user),
                    joined_at: participant.joined_at,
                    last_read_message_id: participant
                        .last_read_message_id
                        .map(|id| id.to_string()),
                })
                .collect(),
            recent_messages: details
                .recent_messages
                .into_iter()
                .map(MessageResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parley_core::entities::Message;
    use parley_core::Snowflake;

    #[test]
    fn test_message_response_serializes_ids_as_strings() {
        let sender = User::new(Snowflake::new(7), "ada", "Ada");
        let message = Message::new(
            Snowflake::new(42),
            Snowflake::new(9),
            sender.id,
            Some("hi".to_string()),
            None,
        );

        let response = MessageResponse::from(MessageWithSender { message, sender });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], "42");
        assert_eq!(json["conversation_id"], "9");
        assert_eq!(json["sender"]["id"], "7");
        assert_eq!(json["sender"]["handle"], "ada");
        // absent attachment is omitted, not null
        assert!(json.get("attachment_url").is_none());
    }

    #[test]
    fn test_conversation_view_from_details() {
        let now = Utc::now();
        let user = User::new(Snowflake::new(1), "ada", "Ada");
        let conversation = Conversation {
            id: Snowflake::new(5),
            created_at: now,
            updated_at: now,
        };
        let participant = Participant {
            conversation_id: conversation.id,
            user_id: user.id,
            joined_at: now,
            last_read_message_id: Some(Snowflake::new(3)),
        };

        let view = ConversationView::from(ConversationWithDetails {
            conversation,
            participants: vec![(participant, user)],
            recent_messages: vec![],
        });

        assert_eq!(view.id, "5");
        assert_eq!(view.participants.len(), 1);
        assert_eq!(
            view.participants[0].last_read_message_id.as_deref(),
            Some("3")
        );
    }
}

//! Entity <-> model mappers

use parley_core::entities::{Conversation, Message, Participant, Reaction, User};
use parley_core::traits::MessageWithSender;
use parley_core::value_objects::Snowflake;

use crate::models::{
    ConversationModel, MessageModel, MessageWithSenderModel, ParticipantModel, ReactionModel,
    UserModel,
};

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation {
            id: Snowflake::new(model.id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ParticipantModel> for Participant {
    fn from(model: ParticipantModel) -> Self {
        Participant {
            conversation_id: Snowflake::new(model.conversation_id),
            user_id: Snowflake::new(model.user_id),
            joined_at: model.joined_at,
            last_read_message_id: model.last_read_message_id.map(Snowflake::new),
        }
    }
}

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            conversation_id: Snowflake::new(model.conversation_id),
            sender_id: Snowflake::new(model.sender_id),
            content: model.content,
            attachment_url: model.attachment_url,
            created_at: model.created_at,
        }
    }
}

impl From<ReactionModel> for Reaction {
    fn from(model: ReactionModel) -> Self {
        Reaction {
            message_id: Snowflake::new(model.message_id),
            user_id: Snowflake::new(model.user_id),
            emoji: model.emoji,
            created_at: model.created_at,
        }
    }
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            handle: model.handle,
            display_name: model.display_name,
            avatar: model.avatar,
            created_at: model.created_at,
        }
    }
}

impl From<MessageWithSenderModel> for MessageWithSender {
    fn from(model: MessageWithSenderModel) -> Self {
        MessageWithSender {
            message: Message {
                id: Snowflake::new(model.id),
                conversation_id: Snowflake::new(model.conversation_id),
                sender_id: Snowflake::new(model.sender_id),
                content: model.content,
                attachment_url: model.attachment_url,
                created_at: model.created_at,
            },
            sender: User {
                id: Snowflake::new(model.sender_id),
                handle: model.sender_handle,
                display_name: model.sender_display_name,
                avatar: model.sender_avatar,
                created_at: model.sender_created_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_message_with_sender_mapping() {
        let now = Utc::now();
        let model = MessageWithSenderModel {
            id: 10,
            conversation_id: 20,
            sender_id: 30,
            content: Some("hi".to_string()),
            attachment_url: None,
            created_at: now,
            sender_handle: "ada".to_string(),
            sender_display_name: "Ada Lovelace".to_string(),
            sender_avatar: None,
            sender_created_at: now,
        };

        let joined = MessageWithSender::from(model);
        assert_eq!(joined.message.id, Snowflake::new(10));
        assert_eq!(joined.message.sender_id, joined.sender.id);
        assert_eq!(joined.sender.handle, "ada");
    }
}

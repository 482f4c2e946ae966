//! Client and server event payloads
//!
//! Everything crossing the socket is one JSON object tagged by `type`.
//! Snowflake fields travel as strings; the `Snowflake` serde impls accept
//! both string and integer forms on the way in.

use parley_core::Snowflake;
use parley_service::dto::{ConversationView, MessageResponse, ReadMarkerResponse, UserResponse};
use serde::{Deserialize, Serialize};

/// Events a client may send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Bind this connection to a user and receive the `ready` hydration
    Identify { user_id: Snowflake },

    /// Subscribe to a conversation's room (participants only)
    JoinRoom { conversation_id: Snowflake },

    /// Unsubscribe from a conversation's room
    LeaveRoom { conversation_id: Snowflake },

    /// Persist a message and broadcast it to the room
    SendMessage {
        conversation_id: Snowflake,
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        attachment_url: Option<String>,
    },

    /// Advance the read marker and broadcast a receipt
    MarkRead {
        conversation_id: Snowflake,
        message_id: Snowflake,
    },

    /// Start the TTL-bound typing indicator
    StartTyping { conversation_id: Snowflake },

    /// Clear the typing indicator early
    StopTyping { conversation_id: Snowflake },

    /// Application-level keepalive; refreshes presence last_seen
    Ping,
}

/// Events the gateway sends
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Reply to `identify`: the bound profile and hydrated conversations
    Ready {
        session_id: String,
        user: UserResponse,
        conversations: Vec<ConversationView>,
    },

    /// Acknowledges a successful `join_room`
    RoomJoined { conversation_id: Snowflake },

    /// A message was persisted in a room this connection subscribes to
    NewMessage(MessageResponse),

    /// A participant's read marker moved
    ReadReceipt(ReadMarkerResponse),

    /// A participant started typing
    TypingStart {
        conversation_id: Snowflake,
        user_id: Snowflake,
    },

    /// A participant stopped typing
    TypingStop {
        conversation_id: Snowflake,
        user_id: Snowflake,
    },

    /// Reply to `ping`
    Pong,

    /// Operation failed; delivered only to the originating connection
    Error { code: String, message: String },
}

impl ServerEvent {
    /// Build an error event from a code and message
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ClientEvent {
    /// Parse a JSON text frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identify_accepts_string_and_integer_ids() {
        let from_string = ClientEvent::from_json(r#"{"type":"identify","user_id":"42"}"#).unwrap();
        let from_int = ClientEvent::from_json(r#"{"type":"identify","user_id":42}"#).unwrap();

        assert_eq!(
            from_string,
            ClientEvent::Identify {
                user_id: Snowflake::new(42)
            }
        );
        assert_eq!(from_string, from_int);
    }

    #[test]
    fn test_send_message_optional_fields_default() {
        let event =
            ClientEvent::from_json(r#"{"type":"send_message","conversation_id":"7","content":"hi"}"#)
                .unwrap();

        assert_eq!(
            event,
            ClientEvent::SendMessage {
                conversation_id: Snowflake::new(7),
                content: Some("hi".to_string()),
                attachment_url: None,
            }
        );
    }

    #[test]
    fn test_ping_is_a_bare_tag() {
        let event = ClientEvent::from_json(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(event, ClientEvent::Ping);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(ClientEvent::from_json(r#"{"type":"resume","session_id":"x"}"#).is_err());
    }

    #[test]
    fn test_error_event_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&ServerEvent::error("NOT_IDENTIFIED", "Identify first").to_json().unwrap())
                .unwrap();

        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "NOT_IDENTIFIED");
        assert_eq!(json["message"], "Identify first");
    }

    #[test]
    fn test_new_message_flattens_payload_next_to_tag() {
        let message = MessageResponse {
            id: "3".to_string(),
            conversation_id: "7".to_string(),
            sender: UserResponse {
                id: "1".to_string(),
                handle: "ada".to_string(),
                display_name: "Ada".to_string(),
                avatar: None,
                created_at: chrono::Utc::now(),
            },
            content: Some("hi".to_string()),
            attachment_url: None,
            created_at: chrono::Utc::now(),
        };

        let json: serde_json::Value =
            serde_json::from_str(&ServerEvent::NewMessage(message).to_json().unwrap()).unwrap();

        assert_eq!(json["type"], "new_message");
        assert_eq!(json["id"], "3");
        assert_eq!(json["conversation_id"], "7");
        assert_eq!(json["sender"]["handle"], "ada");
    }

    #[test]
    fn test_typing_events_carry_string_ids() {
        let json: serde_json::Value = serde_json::from_str(
            &ServerEvent::TypingStart {
                conversation_id: Snowflake::new(7),
                user_id: Snowflake::new(1),
            }
            .to_json()
            .unwrap(),
        )
        .unwrap();

        assert_eq!(json["type"], "typing_start");
        assert_eq!(json["conversation_id"], "7");
        assert_eq!(json["user_id"], "1");
    }
}

//! Message and read-marker handlers

use super::HandlerResult;
use crate::protocol::ServerEvent;
use crate::server::GatewayState;
use parley_core::Snowflake;
use parley_service::dto::SendMessageRequest;
use parley_service::MessagingService;

/// Handles `send_message` and `mark_read` events
pub struct MessageHandler;

impl MessageHandler {
    /// Persist a message, then broadcast it to the room
    ///
    /// The broadcast reaches every subscribed connection, including the
    /// sender's own. Failures before persistence surface as an `error`
    /// event to the sender only.
    pub async fn send(
        state: &GatewayState,
        user_id: Snowflake,
        conversation_id: Snowflake,
        content: Option<String>,
        attachment_url: Option<String>,
    ) -> HandlerResult<()> {
        let message = MessagingService::new(state.service_context())
            .save_message(
                user_id,
                SendMessageRequest {
                    conversation_id,
                    content,
                    attachment_url,
                },
            )
            .await?;

        state
            .connection_manager()
            .send_to_room(conversation_id, ServerEvent::NewMessage(message), None)
            .await;

        Ok(())
    }

    /// Advance the read marker, then broadcast the receipt to the room
    ///
    /// The receipt carries the marker actually in effect, which may be
    /// older than the requested message when the pointer did not move.
    pub async fn mark_read(
        state: &GatewayState,
        user_id: Snowflake,
        conversation_id: Snowflake,
        message_id: Snowflake,
    ) -> HandlerResult<()> {
        let marker = MessagingService::new(state.service_context())
            .mark_read(user_id, conversation_id, message_id)
            .await?;

        state
            .connection_manager()
            .send_to_room(conversation_id, ServerEvent::ReadReceipt(marker), None)
            .await;

        Ok(())
    }
}

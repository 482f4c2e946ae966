//! Typing indicator handlers

use super::HandlerResult;
use crate::protocol::ServerEvent;
use crate::server::GatewayState;
use parley_core::Snowflake;
use parley_service::PresenceService;

/// Handles `start_typing` and `stop_typing` events
pub struct TypingHandler;

impl TypingHandler {
    /// Record the TTL-bound indicator and broadcast to the room
    ///
    /// The typer's own connections are excluded from the broadcast.
    pub async fn start(
        state: &GatewayState,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> HandlerResult<()> {
        PresenceService::new(state.service_context())
            .start_typing(user_id, conversation_id)
            .await?;

        state
            .connection_manager()
            .send_to_room(
                conversation_id,
                ServerEvent::TypingStart {
                    conversation_id,
                    user_id,
                },
                Some(user_id),
            )
            .await;

        Ok(())
    }

    /// Clear the indicator early and broadcast to the room
    pub async fn stop(
        state: &GatewayState,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> HandlerResult<()> {
        PresenceService::new(state.service_context())
            .stop_typing(user_id, conversation_id)
            .await?;

        state
            .connection_manager()
            .send_to_room(
                conversation_id,
                ServerEvent::TypingStop {
                    conversation_id,
                    user_id,
                },
                Some(user_id),
            )
            .await;

        Ok(())
    }
}

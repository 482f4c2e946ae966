//! Room subscription handlers

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::ServerEvent;
use crate::server::GatewayState;
use parley_core::{DomainError, Snowflake};
use parley_service::MessagingService;
use std::sync::Arc;

/// Handles `join_room` and `leave_room` events
pub struct RoomHandler;

impl RoomHandler {
    /// Subscribe the connection to a conversation's room
    ///
    /// A join is never a silent no-op: the client gets a `room_joined` ack
    /// or an `error` rejection.
    pub async fn join(
        state: &GatewayState,
        connection: &Arc<Connection>,
        user_id: Snowflake,
        conversation_id: Snowflake,
    ) -> HandlerResult<()> {
        let is_participant = MessagingService::new(state.service_context())
            .is_participant(user_id, conversation_id)
            .await?;

        if !is_participant {
            return Err(DomainError::NotParticipant {
                user_id,
                conversation_id,
            }
            .into());
        }

        state
            .connection_manager()
            .join_room(connection.session_id(), conversation_id)
            .await;

        connection
            .send(ServerEvent::RoomJoined { conversation_id })
            .await
            .map_err(|e| HandlerError::Internal(format!("Failed to ack join: {e}")))?;

        Ok(())
    }

    /// Unsubscribe the connection from a conversation's room
    pub async fn leave(
        state: &GatewayState,
        connection: &Arc<Connection>,
        conversation_id: Snowflake,
    ) -> HandlerResult<()> {
        state
            .connection_manager()
            .leave_room(connection.session_id(), conversation_id)
            .await;

        Ok(())
    }
}

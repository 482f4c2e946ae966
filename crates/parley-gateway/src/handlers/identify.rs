//! Identify handler

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::ServerEvent;
use crate::server::GatewayState;
use parley_core::{DomainError, Snowflake};
use parley_service::dto::UserResponse;
use parley_service::{MessagingService, PresenceService};
use std::sync::Arc;

/// Handles `identify` events
pub struct IdentifyHandler;

impl IdentifyHandler {
    /// Bind a connection to a user and send the `ready` hydration
    ///
    /// Token verification happened upstream; the user id is trusted here
    /// but must resolve to a stored profile.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        user_id: Snowflake,
    ) -> HandlerResult<()> {
        if connection.is_identified().await {
            tracing::warn!(
                session_id = %connection.session_id(),
                "Client sent identify while already bound"
            );
            return Err(HandlerError::AlreadyIdentified);
        }

        let user = state
            .service_context()
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let session_id = connection.session_id().to_string();

        if !state.connection_manager().bind_user(&session_id, user_id).await {
            return Err(HandlerError::Internal("Connection vanished during identify".to_string()));
        }

        PresenceService::new(state.service_context())
            .set_online(user_id, &session_id)
            .await?;

        let conversations = MessagingService::new(state.service_context())
            .get_user_conversations(user_id)
            .await?;

        tracing::info!(
            session_id = %session_id,
            user_id = %user_id,
            handle = %user.handle,
            conversations = conversations.len(),
            "Client identified"
        );

        connection
            .send(ServerEvent::Ready {
                session_id,
                user: UserResponse::from(&user),
                conversations,
            })
            .await
            .map_err(|e| HandlerError::Internal(format!("Failed to send ready: {e}")))?;

        Ok(())
    }
}

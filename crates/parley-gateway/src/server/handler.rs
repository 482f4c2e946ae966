//! WebSocket handler
//!
//! Handles WebSocket connections and event processing.

use crate::connection::{Connection, ConnectionState};
use crate::handlers::EventDispatcher;
use crate::protocol::{ClientEvent, ServerEvent};
use crate::server::GatewayState;
use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use parley_service::PresenceService;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Channel buffer size for outgoing events
const EVENT_BUFFER_SIZE: usize = 100;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: axum::extract::ws::WebSocket) {
    let session_id = uuid::Uuid::new_v4().to_string();

    // Create event channel for outgoing events
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(EVENT_BUFFER_SIZE);

    // Register connection
    let connection = state
        .connection_manager()
        .add_connection(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Clone state for tasks
    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let connection_recv = connection.clone();

    // Spawn task to receive events from the WebSocket
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    handle_text_frame(&state_recv, &connection_recv, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %session_id_recv,
                        "Binary frames not supported"
                    );
                    send_error(&connection_recv, "DECODE_ERROR", "Binary frames not supported")
                        .await;
                }
                Ok(Message::Ping(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Ping received");
                    // Pong is handled automatically by axum
                }
                Ok(Message::Pong(_)) => {
                    tracing::trace!(session_id = %session_id_recv, "Pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id_recv,
                        error = %e,
                        "WebSocket error"
                    );
                    return;
                }
            }
        }
    });

    // Clone for send task
    let session_id_send = session_id.clone();

    // Spawn task to send events to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event.to_json() {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send event to WebSocket"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        session_id = %session_id_send,
                        error = %e,
                        "Failed to serialize event"
                    );
                }
            }
        }

        // Close the WebSocket when the channel is closed
        let _ = ws_sink.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
        }
        _ = send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
        }
    }

    // Clean up
    cleanup_connection(&state, &session_id, &connection).await;
}

/// Handle a text frame from the client
///
/// Handler errors never close the socket; they come back as an `error`
/// event to this connection only.
async fn handle_text_frame(state: &GatewayState, connection: &Arc<Connection>, text: &str) {
    let event = match ClientEvent::from_json(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(
                session_id = %connection.session_id(),
                error = %e,
                "Failed to parse event"
            );
            send_error(connection, "DECODE_ERROR", "Malformed event").await;
            return;
        }
    };

    if let Err(e) = EventDispatcher::dispatch(state, connection, event).await {
        tracing::debug!(
            session_id = %connection.session_id(),
            code = e.code(),
            error = %e,
            "Handler error"
        );
        send_error(connection, e.code(), &e.client_message()).await;
    }
}

/// Send an `error` event to a single connection
async fn send_error(connection: &Arc<Connection>, code: &str, message: &str) {
    if connection
        .send(ServerEvent::error(code, message))
        .await
        .is_err()
    {
        tracing::debug!(
            session_id = %connection.session_id(),
            "Connection gone before error delivery"
        );
    }
}

/// Clean up a connection on disconnect
///
/// When the user's last connection drops, their presence goes offline.
async fn cleanup_connection(state: &GatewayState, session_id: &str, connection: &Arc<Connection>) {
    tracing::info!(session_id = %session_id, "Cleaning up connection");

    connection.set_state(ConnectionState::Disconnected).await;

    let user_id = connection.user_id().await;

    // Remove from the registry first so the remaining-connections check
    // does not count this session
    state.connection_manager().remove_connection(session_id).await;

    if let Some(user_id) = user_id {
        let remaining = state.connection_manager().get_user_connections(user_id);

        if remaining.is_empty() {
            if let Err(e) = PresenceService::new(state.service_context())
                .set_offline(user_id)
                .await
            {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to set offline");
            } else {
                tracing::debug!(user_id = %user_id, "User presence set to offline");
            }
        } else if let Err(e) = PresenceService::new(state.service_context())
            .drop_connection(user_id, session_id)
            .await
        {
            // the record self-corrects via TTL if the prune fails
            tracing::warn!(
                user_id = %user_id,
                error = %e,
                "Failed to prune connection from presence"
            );
        }
    }
}

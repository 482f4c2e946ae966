//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its state.

use crate::protocol::ServerEvent;
use parley_core::Snowflake;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connection established, waiting for Identify
    Connecting,
    /// Identified and ready for events
    Ready,
    /// Connection is closed
    Disconnected,
}

/// A single WebSocket connection
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Bound user ID (None until Identify)
    user_id: RwLock<Option<Snowflake>>,

    /// Current connection state
    state: RwLock<ConnectionState>,

    /// Channel to send events to the WebSocket
    sender: mpsc::Sender<ServerEvent>,

    /// Rooms this connection is subscribed to
    rooms: RwLock<HashSet<Snowflake>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(session_id: String, sender: mpsc::Sender<ServerEvent>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            user_id: RwLock::new(None),
            state: RwLock::new(ConnectionState::Connecting),
            sender,
            rooms: RwLock::new(HashSet::new()),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the bound user ID (if identified)
    pub async fn user_id(&self) -> Option<Snowflake> {
        *self.user_id.read().await
    }

    /// Bind the user ID (on successful identify)
    pub async fn set_user_id(&self, user_id: Snowflake) {
        *self.user_id.write().await = Some(user_id);
    }

    /// Get the current state
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Set the connection state
    pub async fn set_state(&self, state: ConnectionState) {
        *self.state.write().await = state;
    }

    /// Check if the connection has a bound user
    pub async fn is_identified(&self) -> bool {
        self.user_id.read().await.is_some()
    }

    /// Add a room subscription
    pub async fn join_room(&self, conversation_id: Snowflake) {
        self.rooms.write().await.insert(conversation_id);
    }

    /// Remove a room subscription
    pub async fn leave_room(&self, conversation_id: Snowflake) {
        self.rooms.write().await.remove(&conversation_id);
    }

    /// Get all subscribed rooms
    pub async fn rooms(&self) -> Vec<Snowflake> {
        self.rooms.read().await.iter().copied().collect()
    }

    /// Check if subscribed to a room
    pub async fn is_in_room(&self, conversation_id: Snowflake) -> bool {
        self.rooms.read().await.contains(&conversation_id)
    }

    /// Send an event to this connection
    pub async fn send(
        &self,
        event: ServerEvent,
    ) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event).await
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_creation() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("session123".to_string(), tx);

        assert_eq!(conn.session_id(), "session123");
        assert!(conn.user_id().await.is_none());
        assert_eq!(conn.state().await, ConnectionState::Connecting);
        assert!(!conn.is_identified().await);
    }

    #[tokio::test]
    async fn test_connection_identify() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("session123".to_string(), tx);

        let user_id = Snowflake::new(12345);
        conn.set_user_id(user_id).await;
        conn.set_state(ConnectionState::Ready).await;

        assert!(conn.is_identified().await);
        assert_eq!(conn.user_id().await, Some(user_id));
        assert_eq!(conn.state().await, ConnectionState::Ready);
    }

    #[tokio::test]
    async fn test_connection_rooms() {
        let (tx, _rx) = mpsc::channel(10);
        let conn = Connection::new("session123".to_string(), tx);

        let room1 = Snowflake::new(1);
        let room2 = Snowflake::new(2);

        conn.join_room(room1).await;
        conn.join_room(room2).await;

        assert!(conn.is_in_room(room1).await);
        assert!(conn.is_in_room(room2).await);
        assert_eq!(conn.rooms().await.len(), 2);

        conn.leave_room(room1).await;
        assert!(!conn.is_in_room(room1).await);
        assert!(conn.is_in_room(room2).await);
    }

    #[tokio::test]
    async fn test_send_delivers_to_channel() {
        let (tx, mut rx) = mpsc::channel(10);
        let conn = Connection::new("session123".to_string(), tx);

        conn.send(ServerEvent::Pong).await.unwrap();
        assert!(matches!(rx.recv().await, Some(ServerEvent::Pong)));
    }
}

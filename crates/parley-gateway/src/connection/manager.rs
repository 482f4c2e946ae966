//! Connection manager
//!
//! Manages all active WebSocket connections using DashMap for thread-safe access.

use super::{Connection, ConnectionState};
use crate::protocol::ServerEvent;
use dashmap::DashMap;
use parley_core::Snowflake;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Manages all active WebSocket connections
///
/// Uses `DashMap` for concurrent access to connection state.
pub struct ConnectionManager {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// User ID to session IDs mapping
    user_connections: DashMap<Snowflake, HashSet<String>>,

    /// Conversation ID to session IDs mapping
    room_connections: DashMap<Snowflake, HashSet<String>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
            room_connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        session_id: String,
        sender: mpsc::Sender<ServerEvent>,
    ) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections
            .insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "Connection added");

        connection
    }

    /// Remove a connection
    ///
    /// Uses `alter` for atomic modify-and-cleanup operations to avoid TOCTOU race conditions.
    pub async fn remove_connection(&self, session_id: &str) {
        if let Some((_, connection)) = self.connections.remove(session_id) {
            // Remove from user mapping
            if let Some(user_id) = connection.user_id().await {
                // Atomically modify the sessions set
                self.user_connections.alter(&user_id, |_, mut sessions| {
                    sessions.remove(session_id);
                    sessions
                });

                // Clean up empty entry - use retain for atomic removal
                self.user_connections
                    .retain(|_, sessions| !sessions.is_empty());
            }

            // Remove from room mappings
            for conversation_id in connection.rooms().await {
                // Atomically modify the sessions set
                self.room_connections.alter(&conversation_id, |_, mut sessions| {
                    sessions.remove(session_id);
                    sessions
                });
            }

            // Clean up all empty room entries atomically
            self.room_connections
                .retain(|_, sessions| !sessions.is_empty());

            tracing::debug!(session_id = %session_id, "Connection removed");
        }
    }

    /// Get a connection by session ID
    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Bind a connection to a user (on identify)
    pub async fn bind_user(&self, session_id: &str, user_id: Snowflake) -> bool {
        if let Some(connection) = self.connections.get(session_id) {
            connection.set_user_id(user_id).await;
            connection.set_state(ConnectionState::Ready).await;

            // Add to user mapping
            self.user_connections
                .entry(user_id)
                .or_default()
                .insert(session_id.to_string());

            tracing::debug!(
                session_id = %session_id,
                user_id = %user_id,
                "Connection bound to user"
            );

            true
        } else {
            false
        }
    }

    /// Subscribe a connection to a conversation's room
    pub async fn join_room(&self, session_id: &str, conversation_id: Snowflake) -> bool {
        if let Some(connection) = self.connections.get(session_id) {
            connection.join_room(conversation_id).await;

            self.room_connections
                .entry(conversation_id)
                .or_default()
                .insert(session_id.to_string());

            tracing::trace!(
                session_id = %session_id,
                conversation_id = %conversation_id,
                "Connection joined room"
            );

            true
        } else {
            false
        }
    }

    /// Unsubscribe a connection from a conversation's room
    ///
    /// Uses atomic operations to avoid race conditions when cleaning up empty room mappings.
    pub async fn leave_room(&self, session_id: &str, conversation_id: Snowflake) -> bool {
        if let Some(connection) = self.connections.get(session_id) {
            connection.leave_room(conversation_id).await;

            // Atomically modify the sessions set
            self.room_connections.alter(&conversation_id, |_, mut sessions| {
                sessions.remove(session_id);
                sessions
            });

            // Clean up empty entry
            self.room_connections
                .retain(|_, sessions| !sessions.is_empty());

            tracing::trace!(
                session_id = %session_id,
                conversation_id = %conversation_id,
                "Connection left room"
            );

            true
        } else {
            false
        }
    }

    /// Get all connections for a user
    pub fn get_user_connections(&self, user_id: Snowflake) -> Vec<Arc<Connection>> {
        self.user_connections
            .get(&user_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get all connections subscribed to a room
    ///
    /// Snapshots the membership set; a connection joining mid-broadcast
    /// receives either the whole frame or nothing.
    pub fn get_room_connections(&self, conversation_id: Snowflake) -> Vec<Arc<Connection>> {
        self.room_connections
            .get(&conversation_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Send an event to all connections of a user
    pub async fn send_to_user(&self, user_id: Snowflake, event: ServerEvent) -> usize {
        let connections = self.get_user_connections(user_id);
        let mut sent = 0;

        for conn in connections {
            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            user_id = %user_id,
            sent = sent,
            "Event sent to user connections"
        );

        sent
    }

    /// Send an event to all connections subscribed to a room
    ///
    /// A sender's own connections receive the broadcast too, unless excluded.
    pub async fn send_to_room(
        &self,
        conversation_id: Snowflake,
        event: ServerEvent,
        exclude_user: Option<Snowflake>,
    ) -> usize {
        let connections = self.get_room_connections(conversation_id);
        let mut sent = 0;

        for conn in connections {
            // Skip excluded user
            if let Some(exclude) = exclude_user {
                if conn.user_id().await == Some(exclude) {
                    continue;
                }
            }

            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            conversation_id = %conversation_id,
            sent = sent,
            "Event sent to room connections"
        );

        sent
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of unique identified users
    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }

    /// Get the number of rooms with active connections
    pub fn room_count(&self) -> usize {
        self.room_connections.len()
    }

    /// Check if a session exists
    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("users", &self.user_connections.len())
            .field("rooms", &self.room_connections.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_manager_creation() {
        let manager = ConnectionManager::new();
        assert_eq!(manager.connection_count(), 0);
        assert_eq!(manager.user_count(), 0);
        assert_eq!(manager.room_count(), 0);
    }

    #[tokio::test]
    async fn test_add_remove_connection() {
        let manager = ConnectionManager::new();
        let (tx, _rx) = mpsc::channel(10);

        let conn = manager.add_connection("session1".to_string(), tx);
        assert_eq!(conn.session_id(), "session1");
        assert_eq!(manager.connection_count(), 1);
        assert!(manager.has_session("session1"));

        manager.remove_connection("session1").await;
        assert_eq!(manager.connection_count(), 0);
        assert!(!manager.has_session("session1"));
    }

    #[tokio::test]
    async fn test_bind_user() {
        let manager = ConnectionManager::new();
        let (tx, _rx) = mpsc::channel(10);

        manager.add_connection("session1".to_string(), tx);

        let user_id = Snowflake::new(12345);
        assert!(manager.bind_user("session1", user_id).await);
        assert_eq!(manager.user_count(), 1);

        let connections = manager.get_user_connections(user_id);
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].state().await, ConnectionState::Ready);
    }

    #[tokio::test]
    async fn test_room_subscriptions() {
        let manager = ConnectionManager::new();
        let (tx, _rx) = mpsc::channel(10);

        manager.add_connection("session1".to_string(), tx);

        let conversation_id = Snowflake::new(67890);
        assert!(manager.join_room("session1", conversation_id).await);
        assert_eq!(manager.room_count(), 1);

        let connections = manager.get_room_connections(conversation_id);
        assert_eq!(connections.len(), 1);

        assert!(manager.leave_room("session1", conversation_id).await);
        let connections = manager.get_room_connections(conversation_id);
        assert_eq!(connections.len(), 0);
    }

    #[tokio::test]
    async fn test_multiple_user_connections() {
        let manager = ConnectionManager::new();
        let (tx1, _rx1) = mpsc::channel(10);
        let (tx2, _rx2) = mpsc::channel(10);

        manager.add_connection("session1".to_string(), tx1);
        manager.add_connection("session2".to_string(), tx2);

        let user_id = Snowflake::new(12345);
        manager.bind_user("session1", user_id).await;
        manager.bind_user("session2", user_id).await;

        let connections = manager.get_user_connections(user_id);
        assert_eq!(connections.len(), 2);
        assert_eq!(manager.user_count(), 1);
    }

    #[tokio::test]
    async fn test_room_broadcast_reaches_every_session_once() {
        let manager = ConnectionManager::new();
        let (tx1, mut rx1) = mpsc::channel(10);
        let (tx2, mut rx2) = mpsc::channel(10);

        manager.add_connection("session1".to_string(), tx1);
        manager.add_connection("session2".to_string(), tx2);
        manager.bind_user("session1", Snowflake::new(1)).await;
        manager.bind_user("session2", Snowflake::new(2)).await;

        let room = Snowflake::new(7);
        manager.join_room("session1", room).await;
        manager.join_room("session2", room).await;

        let sent = manager.send_to_room(room, ServerEvent::Pong, None).await;
        assert_eq!(sent, 2);
        assert!(matches!(rx1.try_recv(), Ok(ServerEvent::Pong)));
        assert!(matches!(rx2.try_recv(), Ok(ServerEvent::Pong)));
        assert!(rx1.try_recv().is_err());
    }

    // Multi-device: every session of the same user gets its own copy.
    #[tokio::test]
    async fn test_same_user_sessions_each_receive_room_broadcast() {
        let manager = ConnectionManager::new();
        let (tx1, mut rx1) = mpsc::channel(10);
        let (tx2, mut rx2) = mpsc::channel(10);

        manager.add_connection("session1".to_string(), tx1);
        manager.add_connection("session2".to_string(), tx2);
        let user_id = Snowflake::new(1);
        manager.bind_user("session1", user_id).await;
        manager.bind_user("session2", user_id).await;

        let room = Snowflake::new(7);
        manager.join_room("session1", room).await;
        manager.join_room("session2", room).await;

        let sent = manager.send_to_room(room, ServerEvent::Pong, None).await;
        assert_eq!(sent, 2);
        assert!(matches!(rx1.try_recv(), Ok(ServerEvent::Pong)));
        assert!(matches!(rx2.try_recv(), Ok(ServerEvent::Pong)));
    }

    #[tokio::test]
    async fn test_room_broadcast_excludes_user() {
        let manager = ConnectionManager::new();
        let (tx1, mut rx1) = mpsc::channel(10);
        let (tx2, mut rx2) = mpsc::channel(10);

        manager.add_connection("session1".to_string(), tx1);
        manager.add_connection("session2".to_string(), tx2);
        manager.bind_user("session1", Snowflake::new(1)).await;
        manager.bind_user("session2", Snowflake::new(2)).await;

        let room = Snowflake::new(7);
        manager.join_room("session1", room).await;
        manager.join_room("session2", room).await;

        let sent = manager
            .send_to_room(room, ServerEvent::Pong, Some(Snowflake::new(1)))
            .await;
        assert_eq!(sent, 1);
        assert!(rx1.try_recv().is_err());
        assert!(matches!(rx2.try_recv(), Ok(ServerEvent::Pong)));
    }

    #[tokio::test]
    async fn test_remove_connection_clears_room_membership() {
        let manager = ConnectionManager::new();
        let (tx, _rx) = mpsc::channel(10);

        manager.add_connection("session1".to_string(), tx);
        manager.bind_user("session1", Snowflake::new(1)).await;
        manager.join_room("session1", Snowflake::new(7)).await;

        manager.remove_connection("session1").await;
        assert_eq!(manager.room_count(), 0);
        assert_eq!(manager.user_count(), 0);
        assert!(manager.get_room_connections(Snowflake::new(7)).is_empty());
    }
}

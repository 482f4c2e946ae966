//! Connection tracking
//!
//! Per-socket state and the process-local registry of live connections.

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState};
pub use manager::ConnectionManager;

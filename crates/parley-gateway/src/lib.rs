//! # parley-gateway
//!
//! WebSocket gateway for real-time presence and room-based messaging.

pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::run;

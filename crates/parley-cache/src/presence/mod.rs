//! Presence, typing indicators, and unread counters

mod presence_store;

pub use presence_store::{RedisPresenceStore, PRESENCE_TTL, TYPING_TTL};

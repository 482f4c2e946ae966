//! # parley-cache
//!
//! Redis caching layer for presence, typing indicators, unread counters,
//! and the notification job queue.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Presence**: Per-user presence records, the global online set,
//!   ephemeral typing indicators, and unread counters
//! - **Jobs**: Redis-list backed notification queue
//!
//! ## Example
//!
//! ```ignore
//! use parley_cache::{RedisPool, RedisPoolConfig, RedisPresenceStore};
//! use parley_core::traits::{PresenceData, PresenceStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let store = RedisPresenceStore::new(pool.clone());
//!
//! let presence = PresenceData::new(user_id, "conn-1".to_string());
//! store.set_presence(&presence).await?;
//! store.add_online_user(user_id).await?;
//! ```

pub mod jobs;
pub mod pool;
pub mod presence;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};

// Re-export presence types
pub use presence::{RedisPresenceStore, PRESENCE_TTL, TYPING_TTL};

// Re-export job types
pub use jobs::{RedisNotificationQueue, NOTIFICATION_QUEUE_KEY};

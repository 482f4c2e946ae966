//! Redis-list backed notification queue.
//!
//! Jobs are LPUSHed onto a single list; an external worker BRPOPs and
//! delivers. The producer side here never blocks on delivery.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::instrument;

use parley_core::error::DomainError;
use parley_core::traits::{NotificationJob, NotificationQueue};

use crate::pool::RedisPool;

/// List key the delivery worker consumes from
pub const NOTIFICATION_QUEUE_KEY: &str = "jobs:notifications";

/// Redis implementation of the notification queue
#[derive(Clone)]
pub struct RedisNotificationQueue {
    pool: RedisPool,
}

impl RedisNotificationQueue {
    /// Create a new queue producer
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationQueue for RedisNotificationQueue {
    #[instrument(skip(self, job))]
    async fn enqueue(&self, job: &NotificationJob) -> Result<(), DomainError> {
        let payload =
            serde_json::to_string(job).map_err(|e| DomainError::InternalError(e.to_string()))?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| DomainError::CacheError(e.to_string()))?;

        conn.lpush::<_, _, ()>(NOTIFICATION_QUEUE_KEY, &payload)
            .await
            .map_err(|e| DomainError::CacheError(e.to_string()))?;

        tracing::debug!(queue = NOTIFICATION_QUEUE_KEY, "Enqueued notification job");

        Ok(())
    }
}

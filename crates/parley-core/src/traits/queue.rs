//! Notification queue port
//!
//! The job queue is an external collaborator: the core only needs a
//! fire-and-forget enqueue. Failures are the producer's problem to log,
//! never the caller's to handle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// A notification job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationJob {
    /// Someone reacted to the recipient's message
    ReactionReceived {
        actor_id: Snowflake,
        recipient_id: Snowflake,
        message_id: Snowflake,
        emoji: String,
        actor_name: String,
        /// Truncated text of the reacted-to message, for display
        message_preview: String,
    },
}

/// Fire-and-forget job queue interface
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Enqueue a job for out-of-band delivery
    async fn enqueue(&self, job: &NotificationJob) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_serialization() {
        let job = NotificationJob::ReactionReceived {
            actor_id: Snowflake::new(1),
            recipient_id: Snowflake::new(2),
            message_id: Snowflake::new(3),
            emoji: "👍".to_string(),
            actor_name: "ada".to_string(),
            message_preview: "react to me".to_string(),
        };

        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains("\"kind\":\"reaction_received\""));

        let back: NotificationJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }
}

//! Notification producer
//!
//! Fire-and-forget fan-out to the out-of-band notification queue. Enqueue
//! happens on a spawned task so the calling operation never waits on the
//! queue, and failures are logged and swallowed.

use parley_core::traits::NotificationJob;
use parley_core::Snowflake;
use tracing::{debug, warn};

use super::context::ServiceContext;

/// Notification producer
pub struct NotificationProducer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationProducer<'a> {
    /// Create a new NotificationProducer
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fire a "someone reacted to your message" notification
    ///
    /// No-op when the actor reacted to their own message. Returns
    /// immediately; delivery happens on a detached task.
    pub fn send_reaction_notification(
        &self,
        actor_id: Snowflake,
        recipient_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
        actor_name: String,
        message_preview: String,
    ) {
        if actor_id == recipient_id {
            debug!(user_id = %actor_id, "Skipping self-reaction notification");
            return;
        }

        let job = NotificationJob::ReactionReceived {
            actor_id,
            recipient_id,
            message_id,
            emoji: emoji.to_string(),
            actor_name,
            message_preview,
        };

        let queue = self.ctx.notification_queue();
        tokio::spawn(async move {
            if let Err(e) = queue.enqueue(&job).await {
                warn!(error = %e, "Failed to enqueue reaction notification");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHarness;

    #[tokio::test]
    async fn test_notification_enqueued_off_path() {
        let harness = TestHarness::new();
        let producer = NotificationProducer::new(harness.ctx());

        producer.send_reaction_notification(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            "🔥",
            "ada".to_string(),
            "hello there".to_string(),
        );

        let jobs = harness.queue.wait_for_jobs(1).await;
        assert!(matches!(
            &jobs[0],
            NotificationJob::ReactionReceived { recipient_id, .. }
                if *recipient_id == Snowflake::new(2)
        ));
    }

    #[tokio::test]
    async fn test_self_notification_skipped() {
        let harness = TestHarness::new();
        let producer = NotificationProducer::new(harness.ctx());

        producer.send_reaction_notification(
            Snowflake::new(1),
            Snowflake::new(1),
            Snowflake::new(3),
            "🔥",
            "ada".to_string(),
            "hello there".to_string(),
        );

        tokio::task::yield_now().await;
        assert!(harness.queue.jobs().is_empty());
    }
}

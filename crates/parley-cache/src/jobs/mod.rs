//! Notification job queue

mod notification_queue;

pub use notification_queue::{RedisNotificationQueue, NOTIFICATION_QUEUE_KEY};

//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reactions table
///
/// (message_id, user_id, emoji) carries a UNIQUE constraint.
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub message_id: i64,
    pub user_id: i64,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

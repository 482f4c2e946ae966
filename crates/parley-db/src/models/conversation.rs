//! Conversation database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for conversations table
#[derive(Debug, Clone, FromRow)]
pub struct ConversationModel {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

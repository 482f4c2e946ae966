//! Participant database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for participants table
///
/// (conversation_id, user_id) carries a UNIQUE constraint; duplicate joins
/// surface as a unique violation in the repository.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantModel {
    pub conversation_id: i64,
    pub user_id: i64,
    pub joined_at: DateTime<Utc>,
    pub last_read_message_id: Option<i64>,
}

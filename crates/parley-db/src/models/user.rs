//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table (public profile columns)
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub handle: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

//! User entity - public profile fields
//!
//! Account management (registration, credentials) lives outside this
//! service; only the fields joined into message and participant read
//! shapes are modeled here.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User entity (public profile)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub handle: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User
    pub fn new(id: Snowflake, handle: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
            display_name: display_name.into(),
            avatar: None,
            created_at: Utc::now(),
        }
    }
}

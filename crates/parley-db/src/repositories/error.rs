//! Error handling utilities for repositories

use parley_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return a domain conflict, or fall back
/// to a generic database error.
///
/// This is the concurrency boundary for duplicate-insert races: two
/// concurrent inserts of the same participant or reaction both reach the
/// database, one loses on the constraint, and the loser gets a clean
/// domain-level "already exists" instead of a raw driver error.
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

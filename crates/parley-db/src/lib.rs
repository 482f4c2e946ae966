//! # parley-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `parley-core`:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations with unique-violation translation

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{
    PgConversationRepository, PgMessageRepository, PgParticipantRepository, PgReactionRepository,
    PgUserRepository,
};

//! # parley-core
//!
//! Domain layer containing entities, value objects, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Conversation, Message, Participant, Reaction, User};
pub use error::DomainError;
pub use traits::{
    ConversationRepository, MessageQuery, MessageRepository, MessageWithSender,
    NotificationJob, NotificationQueue, ParticipantRepository, PresenceData, PresenceStore,
    ReactionRepository, RepoResult, TypingData, UserRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};

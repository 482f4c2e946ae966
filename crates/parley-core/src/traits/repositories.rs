//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Each trait exposes exactly the query shapes
//! the services use; the storage engine stays hidden behind them.

use async_trait::async_trait;

use crate::entities::{Conversation, Message, Participant, Reaction, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// A message joined with its sender's public profile
///
/// Deliberate denormalized read shape: the gateway broadcasts a
/// self-contained event without a second round trip for the profile.
#[derive(Debug, Clone)]
pub struct MessageWithSender {
    pub message: Message,
    pub sender: User,
}

/// Pagination options for message queries
#[derive(Debug, Clone)]
pub struct MessageQuery {
    /// Only messages older than this ID
    pub before: Option<Snowflake>,
    pub limit: i64,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            before: None,
            limit: 50,
        }
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find users by IDs (order unspecified, missing IDs skipped)
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Create a new user profile
    async fn create(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find conversation by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>>;

    /// List conversations a user participates in, most recently updated first
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Conversation>>;

    /// Create a new conversation
    async fn create(&self, conversation: &Conversation) -> RepoResult<()>;

    /// Bump updated_at (called when a message is saved)
    async fn touch(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Participant Repository
// ============================================================================

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Find a participant record by conversation and user
    async fn find(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Participant>>;

    /// List all participants of a conversation
    async fn find_by_conversation(&self, conversation_id: Snowflake)
        -> RepoResult<Vec<Participant>>;

    /// Check participancy without loading the row
    async fn is_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool>;

    /// Add a participant; duplicate joins surface as `AlreadyParticipant`
    async fn create(&self, participant: &Participant) -> RepoResult<()>;

    /// Update one participant's read marker
    async fn update_last_read(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// List messages in a conversation, newest first, joined with sender profiles
    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<MessageWithSender>>;

    /// Persist a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find reaction by message, user, and emoji
    async fn find(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<Option<Reaction>>;

    /// Add a reaction; a duplicate surfaces as `ReactionAlreadyExists`
    async fn create(&self, reaction: &Reaction) -> RepoResult<()>;

    /// Remove a reaction
    async fn delete(&self, message_id: Snowflake, user_id: Snowflake, emoji: &str)
        -> RepoResult<()>;
}

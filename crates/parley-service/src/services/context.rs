//! Service context - dependency container for services
//!
//! Holds all repositories, cache stores, and other dependencies needed by services.

use std::sync::Arc;

use parley_cache::SharedRedisPool;
use parley_core::traits::{
    ConversationRepository, MessageRepository, NotificationQueue, ParticipantRepository,
    PresenceStore, ReactionRepository, UserRepository,
};
use parley_core::SnowflakeGenerator;
use parley_db::PgPool;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - Redis presence store
/// - Notification job queue
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Redis pool
    redis_pool: SharedRedisPool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    conversation_repo: Arc<dyn ConversationRepository>,
    participant_repo: Arc<dyn ParticipantRepository>,
    message_repo: Arc<dyn MessageRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,

    // Cache stores
    presence_store: Arc<dyn PresenceStore>,

    // Job queue
    notification_queue: Arc<dyn NotificationQueue>,

    // Services
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        user_repo: Arc<dyn UserRepository>,
        conversation_repo: Arc<dyn ConversationRepository>,
        participant_repo: Arc<dyn ParticipantRepository>,
        message_repo: Arc<dyn MessageRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        presence_store: Arc<dyn PresenceStore>,
        notification_queue: Arc<dyn NotificationQueue>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            pool,
            redis_pool,
            user_repo,
            conversation_repo,
            participant_repo,
            message_repo,
            reaction_repo,
            presence_store,
            notification_queue,
            snowflake_generator,
        }
    }

    // === Pools ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the Redis connection pool
    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the conversation repository
    pub fn conversation_repo(&self) -> &dyn ConversationRepository {
        self.conversation_repo.as_ref()
    }

    /// Get the participant repository
    pub fn participant_repo(&self) -> &dyn ParticipantRepository {
        self.participant_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Cache Stores ===

    /// Get the presence store
    pub fn presence_store(&self) -> &dyn PresenceStore {
        self.presence_store.as_ref()
    }

    // === Job Queue ===

    /// Get the notification queue (shared handle, cloneable into tasks)
    pub fn notification_queue(&self) -> Arc<dyn NotificationQueue> {
        Arc::clone(&self.notification_queue)
    }

    // === Services ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> parley_core::Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &"SharedRedisPool")
            .field("repositories", &"...")
            .field("cache_stores", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    conversation_repo: Option<Arc<dyn ConversationRepository>>,
    participant_repo: Option<Arc<dyn ParticipantRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    presence_store: Option<Arc<dyn PresenceStore>>,
    notification_queue: Option<Arc<dyn NotificationQueue>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            redis_pool: None,
            user_repo: None,
            conversation_repo: None,
            participant_repo: None,
            message_repo: None,
            reaction_repo: None,
            presence_store: None,
            notification_queue: None,
            snowflake_generator: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn conversation_repo(mut self, repo: Arc<dyn ConversationRepository>) -> Self {
        self.conversation_repo = Some(repo);
        self
    }

    pub fn participant_repo(mut self, repo: Arc<dyn ParticipantRepository>) -> Self {
        self.participant_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn presence_store(mut self, store: Arc<dyn PresenceStore>) -> Self {
        self.presence_store = Some(store);
        self
    }

    pub fn notification_queue(mut self, queue: Arc<dyn NotificationQueue>) -> Self {
        self.notification_queue = Some(queue);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.pool
                .ok_or_else(|| ServiceError::validation("pool is required"))?,
            self.redis_pool
                .ok_or_else(|| ServiceError::validation("redis_pool is required"))?,
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.conversation_repo
                .ok_or_else(|| ServiceError::validation("conversation_repo is required"))?,
            self.participant_repo
                .ok_or_else(|| ServiceError::validation("participant_repo is required"))?,
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.presence_store
                .ok_or_else(|| ServiceError::validation("presence_store is required"))?,
            self.notification_queue
                .ok_or_else(|| ServiceError::validation("notification_queue is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

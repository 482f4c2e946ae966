//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use parley_core::entities::Conversation;
use parley_core::traits::{ConversationRepository, RepoResult};
use parley_core::value_objects::Snowflake;

use crate::models::ConversationModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT id, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Conversation::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Conversation>> {
        let results = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT c.id, c.created_at, c.updated_at
            FROM conversations c
            JOIN participants p ON p.conversation_id = c.id
            WHERE p.user_id = $1
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Conversation::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, conversation: &Conversation) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, created_at, updated_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(conversation.id.into_inner())
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn touch(&self, id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE conversations SET updated_at = NOW() WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

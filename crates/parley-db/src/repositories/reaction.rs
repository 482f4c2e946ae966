//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use parley_core::entities::Reaction;
use parley_core::error::DomainError;
use parley_core::traits::{ReactionRepository, RepoResult};
use parley_core::value_objects::Snowflake;

use crate::models::ReactionModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT message_id, user_id, emoji, created_at
            FROM reactions
            WHERE message_id = $1 AND user_id = $2 AND emoji = $3
            "#,
        )
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .bind(emoji)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Reaction::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, reaction: &Reaction) -> RepoResult<()> {
        // A plain INSERT: the unique constraint resolves duplicate races and
        // the loser gets a domain-level conflict, not a driver error.
        sqlx::query(
            r#"
            INSERT INTO reactions (message_id, user_id, emoji, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(reaction.message_id.into_inner())
        .bind(reaction.user_id.into_inner())
        .bind(&reaction.emoji)
        .bind(reaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM reactions
            WHERE message_id = $1 AND user_id = $2 AND emoji = $3
            "#,
        )
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .bind(emoji)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

//! PostgreSQL implementation of ParticipantRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use parley_core::entities::Participant;
use parley_core::error::DomainError;
use parley_core::traits::{ParticipantRepository, RepoResult};
use parley_core::value_objects::Snowflake;

use crate::models::ParticipantModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ParticipantRepository
#[derive(Clone)]
pub struct PgParticipantRepository {
    pool: PgPool,
}

impl PgParticipantRepository {
    /// Create a new PgParticipantRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Participant>> {
        let result = sqlx::query_as::<_, ParticipantModel>(
            r#"
            SELECT conversation_id, user_id, joined_at, last_read_message_id
            FROM participants
            WHERE conversation_id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Participant::from))
    }

    #[instrument(skip(self))]
    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
    ) -> RepoResult<Vec<Participant>> {
        let results = sqlx::query_as::<_, ParticipantModel>(
            r#"
            SELECT conversation_id, user_id, joined_at, last_read_message_id
            FROM participants
            WHERE conversation_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(conversation_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Participant::from).collect())
    }

    #[instrument(skip(self))]
    async fn is_participant(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM participants WHERE conversation_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn create(&self, participant: &Participant) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO participants (conversation_id, user_id, joined_at, last_read_message_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(participant.conversation_id.into_inner())
        .bind(participant.user_id.into_inner())
        .bind(participant.joined_at)
        .bind(participant.last_read_message_id.map(Snowflake::into_inner))
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyParticipant))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_last_read(
        &self,
        conversation_id: Snowflake,
        user_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE participants
            SET last_read_message_id = $3
            WHERE conversation_id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id.into_inner())
        .bind(user_id.into_inner())
        .bind(message_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotParticipant {
                user_id,
                conversation_id,
            });
        }

        Ok(())
    }
}

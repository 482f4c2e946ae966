//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use parley_core::entities::Message;
use parley_core::traits::{MessageQuery, MessageRepository, MessageWithSender, RepoResult};
use parley_core::value_objects::Snowflake;

use crate::models::{MessageModel, MessageWithSenderModel};

use super::error::map_db_error;

/// Columns for the sender-joined read shape
const JOINED_COLUMNS: &str = r#"
    m.id, m.conversation_id, m.sender_id, m.content, m.attachment_url, m.created_at,
    u.handle AS sender_handle,
    u.display_name AS sender_display_name,
    u.avatar AS sender_avatar,
    u.created_at AS sender_created_at
"#;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, conversation_id, sender_id, content, attachment_url, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    /// List messages newest-first, joined with sender profiles.
    ///
    /// Descending ID order is the documented contract: ID order is creation
    /// order, clients reverse for display, and `before` pages backwards.
    #[instrument(skip(self))]
    async fn find_by_conversation(
        &self,
        conversation_id: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<MessageWithSender>> {
        let limit = query.limit.clamp(1, 100);

        let results = match query.before {
            Some(before) => {
                sqlx::query_as::<_, MessageWithSenderModel>(&format!(
                    r#"
                    SELECT {JOINED_COLUMNS}
                    FROM messages m
                    JOIN users u ON u.id = m.sender_id
                    WHERE m.conversation_id = $1 AND m.id < $2
                    ORDER BY m.id DESC
                    LIMIT $3
                    "#
                ))
                .bind(conversation_id.into_inner())
                .bind(before.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MessageWithSenderModel>(&format!(
                    r#"
                    SELECT {JOINED_COLUMNS}
                    FROM messages m
                    JOIN users u ON u.id = m.sender_id
                    WHERE m.conversation_id = $1
                    ORDER BY m.id DESC
                    LIMIT $2
                    "#
                ))
                .bind(conversation_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(MessageWithSender::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, attachment_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.conversation_id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(&message.content)
        .bind(&message.attachment_url)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

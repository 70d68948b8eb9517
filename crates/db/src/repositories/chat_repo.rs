//! Repository for the `chat_conversations` and `chat_messages` tables.

use mainsight_core::types::DbId;
use sqlx::PgPool;

use crate::models::chat::{ChatMessage, Conversation};

/// Column list for `chat_conversations` queries.
const CONVERSATION_COLUMNS: &str =
    "id, user_id, title, conversation_type, status, started_at, last_message_at";

/// Column list for `chat_messages` queries.
const MESSAGE_COLUMNS: &str = "id, conversation_id, user_id, sender, content, metadata, sent_at";

/// Provides conversation and message persistence for the chatbot.
pub struct ChatRepo;

impl ChatRepo {
    /// Create a conversation for a user.
    pub async fn create_conversation(
        pool: &PgPool,
        user_id: DbId,
        title: &str,
        conversation_type: &str,
    ) -> Result<Conversation, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_conversations (user_id, title, conversation_type) \
             VALUES ($1, $2, $3) \
             RETURNING {CONVERSATION_COLUMNS}"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(user_id)
            .bind(title)
            .bind(conversation_type)
            .fetch_one(pool)
            .await
    }

    /// Find a conversation by id.
    pub async fn find_conversation(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        let query = format!("SELECT {CONVERSATION_COLUMNS} FROM chat_conversations WHERE id = $1");
        sqlx::query_as::<_, Conversation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's conversations, most recently active first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Conversation>, sqlx::Error> {
        let query = format!(
            "SELECT {CONVERSATION_COLUMNS} FROM chat_conversations \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY last_message_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of conversations for a user (for pagination).
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_conversations \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Append a message and bump the conversation's activity timestamp in
    /// one transaction.
    pub async fn append_message(
        pool: &PgPool,
        conversation_id: DbId,
        user_id: DbId,
        sender: &str,
        content: &str,
        metadata: Option<&serde_json::Value>,
    ) -> Result<ChatMessage, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO chat_messages (conversation_id, user_id, sender, content, metadata) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {MESSAGE_COLUMNS}"
        );
        let message = sqlx::query_as::<_, ChatMessage>(&query)
            .bind(conversation_id)
            .bind(user_id)
            .bind(sender)
            .bind(content)
            .bind(metadata)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE chat_conversations SET last_message_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// Messages in a conversation, oldest first.
    pub async fn list_messages(
        pool: &PgPool,
        conversation_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM chat_messages \
             WHERE conversation_id = $1 \
             ORDER BY sent_at \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(conversation_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of messages in a conversation (for pagination).
    pub async fn count_messages(pool: &PgPool, conversation_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE conversation_id = $1")
                .bind(conversation_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}

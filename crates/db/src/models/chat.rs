//! Chat conversation and message entity models and DTOs.

use mainsight_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `chat_conversations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub conversation_type: String,
    pub status: String,
    pub started_at: Timestamp,
    pub last_message_at: Timestamp,
}

/// A row from the `chat_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub conversation_id: DbId,
    pub user_id: DbId,
    pub sender: String,
    pub content: String,
    pub metadata: Option<serde_json::Value>,
    pub sent_at: Timestamp,
}

/// DTO for explicitly creating a conversation.
#[derive(Debug, Deserialize)]
pub struct CreateConversation {
    pub title: Option<String>,
    pub conversation_type: Option<String>,
}

/// Message sender discriminator values.
pub const SENDER_USER: &str = "user";
pub const SENDER_ASSISTANT: &str = "assistant";

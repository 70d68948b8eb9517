//! Handlers for the `/chat` resource.
//!
//! Messages are persisted locally; answering is delegated to the external
//! chatbot. Questions are enriched with machine or alert context before
//! delegation so the bot can answer with fleet specifics.

use axum::extract::{Path, Query, State};
use axum::Json;
use mainsight_core::error::CoreError;
use mainsight_core::types::DbId;
use mainsight_db::models::chat::{CreateConversation, SENDER_ASSISTANT, SENDER_USER};
use mainsight_db::repositories::{AlertRepo, ChatRepo, MachineRepo, SensorReadingRepo};
use mainsight_ml::ChatResponse;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Request body for `POST /chat/message`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Continue an existing conversation, or omit to start a new one.
    pub conversation_id: Option<DbId>,
    pub message: String,
    pub context: Option<MessageContext>,
}

/// Optional context to enrich the question with.
#[derive(Debug, Deserialize)]
pub struct MessageContext {
    pub machine_serial: Option<String>,
    pub alert_id: Option<String>,
}

/// Query parameters for conversation listing.
#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for message listing.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Maximum page size for chat listings.
const MAX_LIMIT: i64 = 100;

/// Default page size for conversation listing.
const DEFAULT_CONVERSATION_LIMIT: i64 = 20;

/// Default page size for message listing.
const DEFAULT_MESSAGE_LIMIT: i64 = 50;

/// Maximum length of an auto-generated conversation title.
const TITLE_MAX_CHARS: usize = 50;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Derive a conversation title from the opening message.
fn title_from_message(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        return trimmed.to_string();
    }
    let prefix: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
    format!("{prefix}...")
}

/// Append machine and alert context to the question, when available.
///
/// Unknown context references are ignored rather than rejected; the
/// question is still worth asking without them.
async fn enrich_question(
    state: &AppState,
    question: &str,
    context: &MessageContext,
) -> AppResult<String> {
    let mut enriched = question.to_string();

    if let Some(serial) = &context.machine_serial {
        if let Some(machine) = MachineRepo::find_by_serial(&state.pool, serial).await? {
            enriched.push_str(&format!(
                "\n\nContext: machine {} ({}), located at {}, status {}.",
                machine.serial, machine.machine_type, machine.location, machine.status
            ));
            if let Some(reading) =
                SensorReadingRepo::latest_for_machine(&state.pool, serial).await?
            {
                enriched.push_str(&format!(
                    " Latest telemetry - air temperature: {}K, process temperature: {}K, \
                     speed: {} rpm, torque: {} Nm, tool wear: {} min.",
                    reading.air_temperature_k,
                    reading.process_temperature_k,
                    reading.rotational_speed_rpm,
                    reading.torque_nm,
                    reading.tool_wear_min
                ));
            }
        }
    }

    if let Some(alert_id) = &context.alert_id {
        if let Some(alert) = AlertRepo::find_detail(&state.pool, alert_id).await? {
            enriched.push_str(&format!(
                "\n\nAlert context: {} - {}. Severity {}, status {}.",
                alert.title, alert.description, alert.severity, alert.status
            ));
        }
    }

    Ok(enriched)
}

/// Map the chatbot's reply shape onto displayable message content.
fn reply_content(response: &ChatResponse) -> String {
    if let Some(text) = &response.response {
        return text.clone();
    }
    if let Some(status) = &response.machine_status {
        let mut content = format!("Machine status: {status}");
        match &response.failure_type {
            Some(failure) => content.push_str(&format!("\nDetected failure type: {failure}")),
            None => content.push_str("\nNo failure type detected. The machine looks healthy."),
        }
        return content;
    }
    "Sorry, I cannot provide an answer right now.".to_string()
}

/// Capture the full chatbot reply as message metadata.
fn reply_metadata(response: &ChatResponse) -> serde_json::Value {
    let mut map = response.extra.clone();
    if let Some(text) = &response.response {
        map.insert("response".into(), serde_json::json!(text));
    }
    if let Some(status) = &response.machine_status {
        map.insert("machine_status".into(), serde_json::json!(status));
    }
    if let Some(failure) = &response.failure_type {
        map.insert("failure_type".into(), serde_json::json!(failure));
    }
    serde_json::Value::Object(map)
}

/// Fetch a conversation, enforcing ownership.
async fn require_owned_conversation(
    state: &AppState,
    conversation_id: DbId,
    user_id: DbId,
) -> AppResult<mainsight_db::models::chat::Conversation> {
    let conversation = ChatRepo::find_conversation(&state.pool, conversation_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Conversation",
                id: conversation_id.to_string(),
            })
        })?;

    if conversation.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Access to this conversation is denied".into(),
        )));
    }
    Ok(conversation)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/chat/message
///
/// Persist the user's message, delegate to the chatbot, persist the
/// reply. A chatbot failure surfaces as 503 after the user message is
/// stored.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let message = input.message.trim();
    if message.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "message must not be empty".into(),
        )));
    }

    let conversation = match input.conversation_id {
        Some(id) => require_owned_conversation(&state, id, auth.user_id).await?,
        None => {
            ChatRepo::create_conversation(
                &state.pool,
                auth.user_id,
                &title_from_message(message),
                "maintenance_support",
            )
            .await?
        }
    };

    let user_message = ChatRepo::append_message(
        &state.pool,
        conversation.id,
        auth.user_id,
        SENDER_USER,
        message,
        None,
    )
    .await?;

    let question = match &input.context {
        Some(context) => enrich_question(&state, message, context).await?,
        None => message.to_string(),
    };

    let response = state.ml.chat(&question).await?;

    let content = reply_content(&response);
    let metadata = reply_metadata(&response);
    let assistant_message = ChatRepo::append_message(
        &state.pool,
        conversation.id,
        auth.user_id,
        SENDER_ASSISTANT,
        &content,
        Some(&metadata),
    )
    .await?;

    Ok(Json(serde_json::json!({
        "data": {
            "conversation_id": conversation.id,
            "user_message": user_message,
            "assistant_message": assistant_message,
        }
    })))
}

/// GET /api/v1/chat/conversations
///
/// List the authenticated user's conversations.
pub async fn list_conversations(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ConversationQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_CONVERSATION_LIMIT)
        .min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let conversations = ChatRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.status.as_deref(),
        limit,
        offset,
    )
    .await?;
    let total =
        ChatRepo::count_for_user(&state.pool, auth.user_id, params.status.as_deref()).await?;

    Ok(Json(serde_json::json!({
        "data": conversations,
        "pagination": {
            "total": total,
            "limit": limit,
            "offset": offset,
            "has_more": total > offset + limit,
        }
    })))
}

/// POST /api/v1/chat/conversations
///
/// Explicitly create a conversation.
pub async fn create_conversation(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateConversation>,
) -> AppResult<Json<serde_json::Value>> {
    let title = input.title.as_deref().unwrap_or("New conversation");
    let conversation_type = input
        .conversation_type
        .as_deref()
        .unwrap_or("maintenance_support");

    let conversation =
        ChatRepo::create_conversation(&state.pool, auth.user_id, title, conversation_type).await?;

    Ok(Json(serde_json::json!({ "data": conversation })))
}

/// GET /api/v1/chat/conversations/{id}/messages
///
/// Messages in one of the user's conversations, oldest first.
pub async fn list_messages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<DbId>,
    Query(params): Query<MessageQuery>,
) -> AppResult<Json<serde_json::Value>> {
    require_owned_conversation(&state, conversation_id, auth.user_id).await?;

    let limit = params
        .limit
        .unwrap_or(DEFAULT_MESSAGE_LIMIT)
        .min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let messages = ChatRepo::list_messages(&state.pool, conversation_id, limit, offset).await?;
    let total = ChatRepo::count_messages(&state.pool, conversation_id).await?;

    Ok(Json(serde_json::json!({
        "data": messages,
        "pagination": {
            "total": total,
            "limit": limit,
            "offset": offset,
            "has_more": total > offset + limit,
        }
    })))
}

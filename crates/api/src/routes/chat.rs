//! Route definitions for the `/chat` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// POST /message                        -> send_message
/// GET  /conversations                  -> list_conversations
/// POST /conversations                  -> create_conversation
/// GET  /conversations/{id}/messages    -> list_messages
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/message", post(chat::send_message))
        .route(
            "/conversations",
            get(chat::list_conversations).post(chat::create_conversation),
        )
        .route("/conversations/{id}/messages", get(chat::list_messages))
}

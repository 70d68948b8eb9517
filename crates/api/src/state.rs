use std::sync::Arc;

use mainsight_ml::MlEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// The ML engine is held as a trait object so tests can substitute a
/// double without touching the handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mainsight_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External ML classifier/chatbot client.
    pub ml: Arc<dyn MlEngine>,
}

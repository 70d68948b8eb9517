//! Route tree assembly.

pub mod alerts;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod health;
pub mod machines;
pub mod predictions;
pub mod sensor_data;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                            login (public)
/// /auth/profile                          current user
///
/// /machines                              list
/// /machines/{serial}                     detail (latest reading + prediction)
/// /machines/{serial}/recompute-status    refresh status projection (POST)
///
/// /sensor-data                           store reading (POST), history (GET)
/// /sensor-data/batch                     store up to 100 readings (POST)
/// /sensor-data/latest                    latest reading for machine
/// /sensor-data/stats                     per-machine aggregates
///
/// /predictions/analyze                   run analysis workflow (POST)
/// /predictions                           list
/// /predictions/latest                    latest for machine
///
/// /alerts                                list (derived status)
/// /alerts/{id}                           detail
/// /alerts/{id}/acknowledge               claim alert (POST)
/// /alerts/{id}/resolve                   resolve alert (POST)
///
/// /dashboard/summary                     fleet header figures
/// /dashboard/trends                      daily averages + recent alerts
///
/// /chat/message                          send message (POST)
/// /chat/conversations                    list (GET), create (POST)
/// /chat/conversations/{id}/messages      message history
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/machines", machines::router())
        .nest("/sensor-data", sensor_data::router())
        .nest("/predictions", predictions::router())
        .nest("/alerts", alerts::router())
        .nest("/dashboard", dashboard::router())
        .nest("/chat", chat::router())
}

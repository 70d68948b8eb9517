//! Handlers for the `/machines` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::Json;
use mainsight_core::error::CoreError;
use mainsight_core::projection::MachineStatus;
use mainsight_db::repositories::{MachineRepo, PredictionRepo, SensorReadingRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /machines`.
#[derive(Debug, Deserialize)]
pub struct MachineQuery {
    /// Filter by projected status (`normal` | `warning` | `critical`).
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for machine listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for machine listing.
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/machines
///
/// List the machine fleet with an optional status filter.
pub async fn list_machines(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MachineQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let status = match params.status.as_deref() {
        Some(raw) => Some(
            MachineStatus::parse(raw)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!(
                        "unknown machine status filter: {raw}"
                    )))
                })?
                .as_str(),
        ),
        None => None,
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let machines = MachineRepo::list(&state.pool, status, limit, offset).await?;

    Ok(Json(serde_json::json!({ "data": machines })))
}

/// GET /api/v1/machines/{serial}
///
/// Machine detail including its latest reading and latest prediction.
pub async fn get_machine(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(serial): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let machine = MachineRepo::find_by_serial(&state.pool, &serial)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Machine",
                id: serial.clone(),
            })
        })?;

    let latest_reading = SensorReadingRepo::latest_for_machine(&state.pool, &serial).await?;
    let latest_prediction = PredictionRepo::latest_for_machine(&state.pool, &serial).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "machine": machine,
            "latest_reading": latest_reading,
            "latest_prediction": latest_prediction,
        }
    })))
}

/// POST /api/v1/machines/{serial}/recompute-status
///
/// Recompute the status projection from unresolved-alert state. The
/// status cache is never directly settable; this is the only way to
/// refresh it outside the analysis and resolution transactions.
pub async fn recompute_status(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(serial): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let status = MachineRepo::recompute_status(&state.pool, &serial)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Machine",
                id: serial.clone(),
            })
        })?;

    Ok(Json(serde_json::json!({
        "data": { "serial": serial, "status": status }
    })))
}

//! Handlers for the `/sensor-data` resource.
//!
//! Readings are validated against the dataset physical ranges before
//! storage. All endpoints require authentication.

use std::collections::BTreeSet;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mainsight_core::error::CoreError;
use mainsight_core::reading::{validate_reading, MAX_BATCH_SIZE};
use mainsight_db::models::sensor_reading::CreateSensorReading;
use mainsight_db::repositories::{MachineRepo, SensorReadingRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Request body for `POST /sensor-data/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub readings: Vec<CreateSensorReading>,
}

/// Query parameters for reading history and latest-reading lookups.
#[derive(Debug, Deserialize)]
pub struct ReadingQuery {
    pub machine_serial: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /sensor-data/stats`.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub machine_serial: Option<String>,
}

/// Maximum page size for reading history.
const MAX_LIMIT: i64 = 500;

/// Default page size for reading history.
const DEFAULT_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Ensure the referenced machine exists, failing with `NotFound` otherwise.
async fn require_machine(state: &AppState, serial: &str) -> AppResult<()> {
    MachineRepo::find_by_serial(&state.pool, serial)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Machine",
                id: serial.to_string(),
            })
        })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sensor-data
///
/// Store one telemetry reading. Returns 201 with the stored row.
pub async fn create_reading(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSensorReading>,
) -> AppResult<impl IntoResponse> {
    validate_reading(&input.values()).map_err(AppError::Core)?;
    require_machine(&state, &input.machine_serial).await?;

    let reading = SensorReadingRepo::insert(&state.pool, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": reading })),
    ))
}

/// POST /api/v1/sensor-data/batch
///
/// Store up to [`MAX_BATCH_SIZE`] readings in one transaction — all or
/// nothing.
pub async fn create_batch(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BatchRequest>,
) -> AppResult<impl IntoResponse> {
    if input.readings.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "readings must not be empty".into(),
        )));
    }
    if input.readings.len() > MAX_BATCH_SIZE {
        return Err(AppError::Core(CoreError::Validation(format!(
            "at most {MAX_BATCH_SIZE} readings per batch, got {}",
            input.readings.len()
        ))));
    }

    for (index, reading) in input.readings.iter().enumerate() {
        validate_reading(&reading.values()).map_err(|err| {
            AppError::Core(CoreError::Validation(format!("readings[{index}]: {err}")))
        })?;
    }

    // Check each distinct serial once so a typo'd machine reports cleanly
    // instead of surfacing as a foreign-key failure.
    let serials: BTreeSet<&str> = input
        .readings
        .iter()
        .map(|r| r.machine_serial.as_str())
        .collect();
    for serial in serials {
        require_machine(&state, serial).await?;
    }

    let stored = SensorReadingRepo::insert_batch(&state.pool, &input.readings).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": { "stored": stored } })),
    ))
}

/// GET /api/v1/sensor-data/latest?machine_serial=SN-001
///
/// The most recent reading for a machine.
pub async fn latest_reading(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ReadingQuery>,
) -> AppResult<Json<serde_json::Value>> {
    require_machine(&state, &params.machine_serial).await?;

    let reading =
        SensorReadingRepo::latest_for_machine(&state.pool, &params.machine_serial).await?;

    Ok(Json(serde_json::json!({ "data": reading })))
}

/// GET /api/v1/sensor-data?machine_serial=SN-001
///
/// Reading history for a machine, newest first.
pub async fn reading_history(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ReadingQuery>,
) -> AppResult<Json<serde_json::Value>> {
    require_machine(&state, &params.machine_serial).await?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let readings =
        SensorReadingRepo::history(&state.pool, &params.machine_serial, limit, offset).await?;

    Ok(Json(serde_json::json!({ "data": readings })))
}

/// GET /api/v1/sensor-data/stats
///
/// Per-machine aggregates, optionally restricted to one machine.
pub async fn reading_stats(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let stats = SensorReadingRepo::stats(&state.pool, params.machine_serial.as_deref()).await?;

    Ok(Json(serde_json::json!({ "data": stats })))
}

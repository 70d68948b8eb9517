//! Handlers for the `/predictions` resource.
//!
//! `analyze` is the prediction workflow: validate the machine and
//! reading, consult the external classifier, then record the reading,
//! verdict, any resulting alert, and the machine status projection in
//! one transaction.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mainsight_core::alert::AlertDraft;
use mainsight_core::error::CoreError;
use mainsight_core::projection::project_status;
use mainsight_core::reading::validate_reading;
use mainsight_core::severity::classify;
use mainsight_db::models::prediction::NewPrediction;
use mainsight_db::models::sensor_reading::CreateSensorReading;
use mainsight_db::repositories::{MachineRepo, PredictionRepo};
use mainsight_ml::PredictRequest;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Request body for `POST /predictions/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub machine_serial: String,
    pub sensor_data: SensorPayload,
}

/// Telemetry quantities submitted for analysis.
#[derive(Debug, Deserialize)]
pub struct SensorPayload {
    pub air_temperature_k: f64,
    pub process_temperature_k: f64,
    pub rotational_speed_rpm: i32,
    pub torque_nm: f64,
    pub tool_wear_min: i32,
    pub raw_payload: Option<serde_json::Value>,
}

/// Query parameters for `GET /predictions`.
#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub machine_serial: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /predictions/latest`.
#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub machine_serial: String,
}

/// Maximum page size for prediction listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for prediction listing.
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/predictions/analyze
///
/// Run the full analysis workflow for one reading. Returns 201 with the
/// stored prediction and the created alert, if any.
pub async fn analyze(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AnalyzeRequest>,
) -> AppResult<impl IntoResponse> {
    // Machine lookup failure aborts before any side effect.
    MachineRepo::find_by_serial(&state.pool, &input.machine_serial)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Machine",
                id: input.machine_serial.clone(),
            })
        })?;

    let reading = CreateSensorReading {
        machine_serial: input.machine_serial.clone(),
        air_temperature_k: input.sensor_data.air_temperature_k,
        process_temperature_k: input.sensor_data.process_temperature_k,
        rotational_speed_rpm: input.sensor_data.rotational_speed_rpm,
        torque_nm: input.sensor_data.torque_nm,
        tool_wear_min: input.sensor_data.tool_wear_min,
        raw_payload: input.sensor_data.raw_payload.clone(),
        reading_timestamp: None,
    };
    validate_reading(&reading.values()).map_err(AppError::Core)?;

    // Consult the classifier before touching storage: a service failure
    // must leave no partial analysis behind.
    let verdict = state
        .ml
        .predict(&PredictRequest {
            air_temperature: reading.air_temperature_k,
            process_temperature: reading.process_temperature_k,
            rotational_speed: reading.rotational_speed_rpm,
            torque: reading.torque_nm,
            tool_wear: reading.tool_wear_min,
        })
        .await?;

    let predicted_failure = verdict.is_failure();
    let severity = classify(verdict.confidence).map_err(AppError::Core)?;

    let draft = AlertDraft::from_prediction(
        &input.machine_serial,
        predicted_failure,
        severity,
        verdict.failure_type.as_deref(),
    );
    let machine_status = project_status(predicted_failure, severity);

    let record = PredictionRepo::record_analysis(
        &state.pool,
        &reading,
        &NewPrediction {
            predicted_failure,
            confidence: verdict.confidence,
            failure_type: verdict.failure_type.clone(),
            severity,
        },
        draft.as_ref(),
        machine_status,
        Some(auth.user_id),
    )
    .await?;

    if let Some(alert) = &record.alert {
        tracing::info!(
            alert_id = %alert.id,
            machine = %alert.machine_serial,
            severity = %alert.severity,
            "prediction raised alert"
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": record })),
    ))
}

/// GET /api/v1/predictions
///
/// List predictions, newest first, optionally for one machine.
pub async fn list_predictions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PredictionQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let predictions = PredictionRepo::list(
        &state.pool,
        params.machine_serial.as_deref(),
        limit,
        offset,
    )
    .await?;

    Ok(Json(serde_json::json!({ "data": predictions })))
}

/// GET /api/v1/predictions/latest?machine_serial=SN-001
///
/// The most recent prediction for a machine.
pub async fn latest_prediction(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LatestQuery>,
) -> AppResult<Json<serde_json::Value>> {
    MachineRepo::find_by_serial(&state.pool, &params.machine_serial)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Machine",
                id: params.machine_serial.clone(),
            })
        })?;

    let prediction =
        PredictionRepo::latest_for_machine(&state.pool, &params.machine_serial).await?;

    Ok(Json(serde_json::json!({ "data": prediction })))
}

//! Prediction entity models and DTOs.

use mainsight_core::severity::Severity;
use mainsight_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::alert::Alert;
use crate::models::sensor_reading::SensorReading;

/// A row from the `predictions` table. Created once per analysis request;
/// immutable. References exactly one sensor reading.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prediction {
    pub id: DbId,
    pub sensor_reading_id: DbId,
    pub predicted_failure: bool,
    pub confidence: f64,
    pub failure_type: Option<String>,
    pub severity: String,
    pub created_at: Timestamp,
}

/// Classifier verdict to be persisted for a reading.
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub predicted_failure: bool,
    pub confidence: f64,
    pub failure_type: Option<String>,
    pub severity: Severity,
}

/// Everything written by one analysis transaction.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub reading: SensorReading,
    pub prediction: Prediction,
    /// Present iff the prediction carried the failure class.
    pub alert: Option<Alert>,
    /// The machine status projected from this prediction.
    pub machine_status: String,
}

/// A prediction joined with its machine, for listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PredictionWithMachine {
    pub id: DbId,
    pub sensor_reading_id: DbId,
    pub machine_serial: String,
    pub predicted_failure: bool,
    pub confidence: f64,
    pub failure_type: Option<String>,
    pub severity: String,
    pub created_at: Timestamp,
}

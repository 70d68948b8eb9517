//! Repository for the `predictions` table, including the analysis
//! transaction that records a reading, its verdict, and any resulting
//! alert as one atomic unit.

use mainsight_core::alert::AlertDraft;
use mainsight_core::projection::MachineStatus;
use mainsight_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::Alert;
use crate::models::prediction::{AnalysisRecord, NewPrediction, Prediction, PredictionWithMachine};
use crate::models::sensor_reading::{CreateSensorReading, SensorReading};

/// Column list for `predictions` queries.
const COLUMNS: &str =
    "id, sensor_reading_id, predicted_failure, confidence, failure_type, severity, created_at";

/// Column list for prediction+machine joins. Aliased to the join's
/// prediction side (`p`) with the reading (`sr`) providing the serial.
const JOINED_COLUMNS: &str = "p.id, p.sensor_reading_id, sr.machine_serial, \
     p.predicted_failure, p.confidence, p.failure_type, p.severity, p.created_at";

/// Provides prediction persistence and history queries.
pub struct PredictionRepo;

impl PredictionRepo {
    /// Record one completed analysis atomically: the reading, its
    /// prediction, the alert (when the verdict is the failure class), and
    /// the machine status projection all commit together or not at all.
    ///
    /// The caller is responsible for validating that the machine exists;
    /// the foreign key is the backstop.
    pub async fn record_analysis(
        pool: &PgPool,
        reading: &CreateSensorReading,
        verdict: &NewPrediction,
        alert_draft: Option<&AlertDraft>,
        machine_status: MachineStatus,
        created_by: Option<DbId>,
    ) -> Result<AnalysisRecord, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let reading_query = format!(
            "INSERT INTO sensor_readings \
             (machine_serial, air_temperature_k, process_temperature_k, \
              rotational_speed_rpm, torque_nm, tool_wear_min, raw_payload, reading_timestamp) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW())) \
             RETURNING id, machine_serial, air_temperature_k, process_temperature_k, \
                       rotational_speed_rpm, torque_nm, tool_wear_min, raw_payload, \
                       reading_timestamp"
        );
        let stored_reading = sqlx::query_as::<_, SensorReading>(&reading_query)
            .bind(&reading.machine_serial)
            .bind(reading.air_temperature_k)
            .bind(reading.process_temperature_k)
            .bind(reading.rotational_speed_rpm)
            .bind(reading.torque_nm)
            .bind(reading.tool_wear_min)
            .bind(&reading.raw_payload)
            .bind(reading.reading_timestamp)
            .fetch_one(&mut *tx)
            .await?;

        let prediction_query = format!(
            "INSERT INTO predictions \
             (sensor_reading_id, predicted_failure, confidence, failure_type, severity) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let prediction = sqlx::query_as::<_, Prediction>(&prediction_query)
            .bind(stored_reading.id)
            .bind(verdict.predicted_failure)
            .bind(verdict.confidence)
            .bind(&verdict.failure_type)
            .bind(verdict.severity.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let alert = match alert_draft {
            Some(draft) => {
                let alert = sqlx::query_as::<_, Alert>(
                    "INSERT INTO alerts \
                     (id, prediction_id, machine_serial, severity, priority, \
                      title, description, created_by) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                     RETURNING id, prediction_id, machine_serial, status, severity, \
                               priority, title, description, created_by, created_at",
                )
                .bind(&draft.id)
                .bind(prediction.id)
                .bind(&draft.machine_serial)
                .bind(draft.severity.as_str())
                .bind(draft.priority)
                .bind(&draft.title)
                .bind(&draft.description)
                .bind(created_by)
                .fetch_one(&mut *tx)
                .await?;
                Some(alert)
            }
            None => None,
        };

        sqlx::query("UPDATE machines SET status = $2 WHERE serial = $1")
            .bind(&reading.machine_serial)
            .bind(machine_status.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(AnalysisRecord {
            reading: stored_reading,
            prediction,
            alert,
            machine_status: machine_status.as_str().to_string(),
        })
    }

    /// List predictions, newest first, optionally for one machine.
    pub async fn list(
        pool: &PgPool,
        serial: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PredictionWithMachine>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} \
             FROM predictions p \
             JOIN sensor_readings sr ON sr.id = p.sensor_reading_id \
             WHERE ($1::text IS NULL OR sr.machine_serial = $1) \
             ORDER BY p.created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, PredictionWithMachine>(&query)
            .bind(serial)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The most recent prediction for a machine.
    pub async fn latest_for_machine(
        pool: &PgPool,
        serial: &str,
    ) -> Result<Option<PredictionWithMachine>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} \
             FROM predictions p \
             JOIN sensor_readings sr ON sr.id = p.sensor_reading_id \
             WHERE sr.machine_serial = $1 \
             ORDER BY p.created_at DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, PredictionWithMachine>(&query)
            .bind(serial)
            .fetch_optional(pool)
            .await
    }
}

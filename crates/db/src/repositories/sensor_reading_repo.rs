//! Repository for the `sensor_readings` table. Append-only.

use sqlx::PgPool;

use crate::models::sensor_reading::{CreateSensorReading, SensorReading, SensorStats};

/// Column list for `sensor_readings` queries.
const COLUMNS: &str = "id, machine_serial, air_temperature_k, process_temperature_k, \
     rotational_speed_rpm, torque_nm, tool_wear_min, raw_payload, reading_timestamp";

/// Provides insertion and history queries for telemetry readings.
pub struct SensorReadingRepo;

impl SensorReadingRepo {
    /// Store one reading.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateSensorReading,
    ) -> Result<SensorReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO sensor_readings \
             (machine_serial, air_temperature_k, process_temperature_k, \
              rotational_speed_rpm, torque_nm, tool_wear_min, raw_payload, reading_timestamp) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(&input.machine_serial)
            .bind(input.air_temperature_k)
            .bind(input.process_temperature_k)
            .bind(input.rotational_speed_rpm)
            .bind(input.torque_nm)
            .bind(input.tool_wear_min)
            .bind(&input.raw_payload)
            .bind(input.reading_timestamp)
            .fetch_one(pool)
            .await
    }

    /// Store a batch of readings in one transaction — all or nothing.
    ///
    /// Returns the number of readings stored.
    pub async fn insert_batch(
        pool: &PgPool,
        inputs: &[CreateSensorReading],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for input in inputs {
            sqlx::query(
                "INSERT INTO sensor_readings \
                 (machine_serial, air_temperature_k, process_temperature_k, \
                  rotational_speed_rpm, torque_nm, tool_wear_min, raw_payload, reading_timestamp) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()))",
            )
            .bind(&input.machine_serial)
            .bind(input.air_temperature_k)
            .bind(input.process_temperature_k)
            .bind(input.rotational_speed_rpm)
            .bind(input.torque_nm)
            .bind(input.tool_wear_min)
            .bind(&input.raw_payload)
            .bind(input.reading_timestamp)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(inputs.len() as u64)
    }

    /// The most recent reading for a machine.
    pub async fn latest_for_machine(
        pool: &PgPool,
        serial: &str,
    ) -> Result<Option<SensorReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sensor_readings \
             WHERE machine_serial = $1 \
             ORDER BY reading_timestamp DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(serial)
            .fetch_optional(pool)
            .await
    }

    /// Reading history for a machine, newest first.
    pub async fn history(
        pool: &PgPool,
        serial: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SensorReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sensor_readings \
             WHERE machine_serial = $1 \
             ORDER BY reading_timestamp DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(serial)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Per-machine aggregates, optionally restricted to one machine.
    pub async fn stats(
        pool: &PgPool,
        serial: Option<&str>,
    ) -> Result<Vec<SensorStats>, sqlx::Error> {
        sqlx::query_as::<_, SensorStats>(
            "SELECT machine_serial, \
                    COUNT(*) AS reading_count, \
                    AVG(air_temperature_k) AS avg_air_temperature_k, \
                    AVG(process_temperature_k) AS avg_process_temperature_k, \
                    MIN(process_temperature_k) AS min_process_temperature_k, \
                    MAX(process_temperature_k) AS max_process_temperature_k, \
                    AVG(rotational_speed_rpm::double precision) AS avg_rotational_speed_rpm, \
                    AVG(torque_nm) AS avg_torque_nm, \
                    MAX(tool_wear_min) AS max_tool_wear_min \
             FROM sensor_readings \
             WHERE ($1::text IS NULL OR machine_serial = $1) \
             GROUP BY machine_serial \
             ORDER BY machine_serial",
        )
        .bind(serial)
        .fetch_all(pool)
        .await
    }
}

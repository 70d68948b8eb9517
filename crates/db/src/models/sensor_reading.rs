//! Sensor reading entity models and DTOs.

use mainsight_core::reading::ReadingValues;
use mainsight_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sensor_readings` table. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SensorReading {
    pub id: DbId,
    pub machine_serial: String,
    pub air_temperature_k: f64,
    pub process_temperature_k: f64,
    pub rotational_speed_rpm: i32,
    pub torque_nm: f64,
    pub tool_wear_min: i32,
    pub raw_payload: Option<serde_json::Value>,
    pub reading_timestamp: Timestamp,
}

/// DTO for submitting one telemetry reading.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSensorReading {
    pub machine_serial: String,
    pub air_temperature_k: f64,
    pub process_temperature_k: f64,
    pub rotational_speed_rpm: i32,
    pub torque_nm: f64,
    pub tool_wear_min: i32,
    pub raw_payload: Option<serde_json::Value>,
    /// Defaults to the insert time when omitted.
    pub reading_timestamp: Option<Timestamp>,
}

impl CreateSensorReading {
    /// The numeric quantities, for range validation.
    pub fn values(&self) -> ReadingValues {
        ReadingValues {
            air_temperature_k: self.air_temperature_k,
            process_temperature_k: self.process_temperature_k,
            rotational_speed_rpm: self.rotational_speed_rpm,
            torque_nm: self.torque_nm,
            tool_wear_min: self.tool_wear_min,
        }
    }
}

/// Per-machine aggregate statistics over stored readings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SensorStats {
    pub machine_serial: String,
    pub reading_count: i64,
    pub avg_air_temperature_k: Option<f64>,
    pub avg_process_temperature_k: Option<f64>,
    pub min_process_temperature_k: Option<f64>,
    pub max_process_temperature_k: Option<f64>,
    pub avg_rotational_speed_rpm: Option<f64>,
    pub avg_torque_nm: Option<f64>,
    pub max_tool_wear_min: Option<i32>,
}

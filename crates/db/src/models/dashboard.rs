//! Dashboard aggregate models.

use mainsight_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// Fleet-level summary figures for the dashboard header cards.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_machines: i64,
    pub operational_machines: i64,
    /// Percentage of machines with `normal` status, rounded.
    pub equipment_status_pct: i64,
    pub active_alerts: i64,
    pub avg_process_temperature_k: f64,
    pub avg_rotational_speed_rpm: f64,
}

/// One day's fleet averages for the trend chart.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrendPoint {
    pub day: Timestamp,
    pub avg_process_temperature_k: Option<f64>,
    pub avg_rotational_speed_rpm: Option<f64>,
}

/// A recent unresolved alert for the dashboard feed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentAlert {
    pub id: String,
    pub machine_serial: String,
    pub severity: String,
    pub status: String,
    pub title: String,
    pub created_at: Timestamp,
}

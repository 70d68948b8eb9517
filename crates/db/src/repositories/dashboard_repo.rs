//! Aggregate queries backing the dashboard endpoints.

use sqlx::PgPool;

use crate::models::dashboard::{DashboardSummary, RecentAlert, TrendPoint};

/// Provides fleet-level aggregates. Read-only.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Header-card figures: fleet size, operational share, unresolved
    /// alert count, and fleet-wide telemetry averages.
    pub async fn summary(pool: &PgPool) -> Result<DashboardSummary, sqlx::Error> {
        let total_machines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM machines")
            .fetch_one(pool)
            .await?;

        let operational_machines: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM machines WHERE status = 'normal'")
                .fetch_one(pool)
                .await?;

        let active_alerts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM alerts a \
             WHERE a.status <> 'resolved'",
        )
        .fetch_one(pool)
        .await?;

        let (avg_process_temperature_k, avg_rotational_speed_rpm): (Option<f64>, Option<f64>) =
            sqlx::query_as(
                "SELECT AVG(process_temperature_k), \
                        AVG(rotational_speed_rpm::double precision) \
                 FROM sensor_readings",
            )
            .fetch_one(pool)
            .await?;

        let equipment_status_pct = if total_machines > 0 {
            (operational_machines as f64 / total_machines as f64 * 100.0).round() as i64
        } else {
            0
        };

        Ok(DashboardSummary {
            total_machines,
            operational_machines,
            equipment_status_pct,
            active_alerts,
            avg_process_temperature_k: avg_process_temperature_k.unwrap_or(0.0),
            avg_rotational_speed_rpm: avg_rotational_speed_rpm.unwrap_or(0.0),
        })
    }

    /// Daily fleet averages for the last `days` days, one bucket per day
    /// including days with no readings.
    pub async fn trends(pool: &PgPool, days: i32) -> Result<Vec<TrendPoint>, sqlx::Error> {
        sqlx::query_as::<_, TrendPoint>(
            "SELECT gs.day, \
                    AVG(sr.process_temperature_k) AS avg_process_temperature_k, \
                    AVG(sr.rotational_speed_rpm::double precision) AS avg_rotational_speed_rpm \
             FROM generate_series( \
                      date_trunc('day', NOW()) - make_interval(days => $1 - 1), \
                      date_trunc('day', NOW()), \
                      interval '1 day') AS gs(day) \
             LEFT JOIN sensor_readings sr \
                    ON date_trunc('day', sr.reading_timestamp) = gs.day \
             GROUP BY gs.day \
             ORDER BY gs.day",
        )
        .bind(days)
        .fetch_all(pool)
        .await
    }

    /// Most recent unresolved alerts for the dashboard feed.
    pub async fn recent_alerts(pool: &PgPool, limit: i64) -> Result<Vec<RecentAlert>, sqlx::Error> {
        sqlx::query_as::<_, RecentAlert>(
            "SELECT a.id, a.machine_serial, a.severity, \
                    CASE \
                        WHEN a.status = 'resolved' THEN 'resolved' \
                        WHEN ack.alert_id IS NOT NULL THEN 'acknowledged' \
                        WHEN a.status = 'acknowledged' THEN 'open' \
                        ELSE a.status END AS status, \
                    a.title, a.created_at \
             FROM alerts a \
             LEFT JOIN alert_acknowledgements ack ON ack.alert_id = a.id \
             WHERE a.status <> 'resolved' \
             ORDER BY a.created_at DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

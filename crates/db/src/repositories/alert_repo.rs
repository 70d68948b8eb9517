//! Repository for the `alerts` and `alert_acknowledgements` tables.
//!
//! The acknowledgement guard lives here: the unique index on
//! `alert_acknowledgements.alert_id` is the sole arbiter of which of two
//! racing requests wins. Application code never decides via
//! check-then-insert — it inserts and interprets the constraint violation.
//!
//! Reads derive an alert's effective status from acknowledgement
//! existence rather than trusting the stored column, so a stale cache
//! self-heals on the next read.

use mainsight_core::alert::AlertStatus;
use mainsight_core::projection::status_from_open_alerts;
use mainsight_core::severity::Severity;
use mainsight_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::{AckOutcome, Acknowledgement, AlertDetail, ResolveOutcome};

/// Unique constraint enforcing at-most-one acknowledgement per alert.
const ACK_UNIQUE_CONSTRAINT: &str = "uq_alert_acknowledgements_alert_id";

/// Effective alert status, derived from the stored status and
/// acknowledgement existence. Requires the query to alias `alerts` as `a`
/// and LEFT JOIN `alert_acknowledgements` as `ack`.
const EFFECTIVE_STATUS: &str = "CASE \
     WHEN a.status = 'resolved' THEN 'resolved' \
     WHEN ack.alert_id IS NOT NULL THEN 'acknowledged' \
     WHEN a.status = 'acknowledged' THEN 'open' \
     ELSE a.status END";

/// Provides alert lifecycle operations and views.
pub struct AlertRepo;

impl AlertRepo {
    /// Detail view with machine context and derived status.
    pub async fn find_detail(
        pool: &PgPool,
        alert_id: &str,
    ) -> Result<Option<AlertDetail>, sqlx::Error> {
        let query = format!(
            "SELECT a.id, a.prediction_id, a.machine_serial, \
                    m.name AS machine_name, m.location, \
                    {EFFECTIVE_STATUS} AS status, \
                    a.severity, a.priority, a.title, a.description, \
                    ack.acknowledged_by, u.name AS acknowledged_by_name, \
                    ack.acknowledged_at, a.created_at \
             FROM alerts a \
             JOIN machines m ON m.serial = a.machine_serial \
             LEFT JOIN alert_acknowledgements ack ON ack.alert_id = a.id \
             LEFT JOIN users u ON u.id = ack.acknowledged_by \
             WHERE a.id = $1"
        );
        sqlx::query_as::<_, AlertDetail>(&query)
            .bind(alert_id)
            .fetch_optional(pool)
            .await
    }

    /// List alerts, newest first, filtered by derived status and severity.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        severity: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertDetail>, sqlx::Error> {
        let query = format!(
            "SELECT a.id, a.prediction_id, a.machine_serial, \
                    m.name AS machine_name, m.location, \
                    {EFFECTIVE_STATUS} AS status, \
                    a.severity, a.priority, a.title, a.description, \
                    ack.acknowledged_by, u.name AS acknowledged_by_name, \
                    ack.acknowledged_at, a.created_at \
             FROM alerts a \
             JOIN machines m ON m.serial = a.machine_serial \
             LEFT JOIN alert_acknowledgements ack ON ack.alert_id = a.id \
             LEFT JOIN users u ON u.id = ack.acknowledged_by \
             WHERE ($1::text IS NULL OR {EFFECTIVE_STATUS} = $1) \
               AND ($2::text IS NULL OR a.severity = $2) \
             ORDER BY a.created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, AlertDetail>(&query)
            .bind(status)
            .bind(severity)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The acknowledgement for an alert, with the acknowledger's name.
    pub async fn find_acknowledgement(
        pool: &PgPool,
        alert_id: &str,
    ) -> Result<Option<Acknowledgement>, sqlx::Error> {
        sqlx::query_as::<_, Acknowledgement>(
            "SELECT ack.alert_id, ack.acknowledged_by, u.name AS acknowledged_by_name, \
                    ack.acknowledged_at \
             FROM alert_acknowledgements ack \
             JOIN users u ON u.id = ack.acknowledged_by \
             WHERE ack.alert_id = $1",
        )
        .bind(alert_id)
        .fetch_optional(pool)
        .await
    }

    /// Acknowledge an alert on behalf of a user.
    ///
    /// Inserts the acknowledgement and transitions the alert status in one
    /// transaction. Under concurrent requests for the same alert, exactly
    /// one insert succeeds; the others observe the unique-constraint
    /// violation, re-read the winning row, and report it.
    pub async fn acknowledge(
        pool: &PgPool,
        alert_id: &str,
        user_id: DbId,
    ) -> Result<AckOutcome, sqlx::Error> {
        let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM alerts WHERE id = $1")
            .bind(alert_id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Ok(AckOutcome::AlertNotFound);
        }

        let mut tx = pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO alert_acknowledgements (alert_id, acknowledged_by) \
             VALUES ($1, $2)",
        )
        .bind(alert_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {
                sqlx::query(
                    "UPDATE alerts SET status = 'acknowledged' \
                     WHERE id = $1 AND status <> 'resolved'",
                )
                .bind(alert_id)
                .execute(&mut *tx)
                .await?;
                tx.commit().await?;

                let ack = Self::find_acknowledgement(pool, alert_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(AckOutcome::Acknowledged(ack))
            }
            Err(err) if is_unique_violation(&err, ACK_UNIQUE_CONSTRAINT) => {
                // Lost the race: another request holds the alert. Report
                // the winner's identity.
                tracing::debug!(alert_id, user_id, "acknowledgement race lost");
                let _ = tx.rollback().await;
                match Self::find_acknowledgement(pool, alert_id).await? {
                    Some(existing) => Ok(AckOutcome::AlreadyAcknowledged(existing)),
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve an alert, bypassing acknowledgement if necessary.
    ///
    /// Refreshes the owning machine's status projection in the same
    /// transaction, since resolution changes the unresolved-alert state
    /// the projection is derived from.
    pub async fn resolve(pool: &PgPool, alert_id: &str) -> Result<ResolveOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(String, String, bool)> = sqlx::query_as(
            "SELECT a.machine_serial, a.status, ack.alert_id IS NOT NULL \
             FROM alerts a \
             LEFT JOIN alert_acknowledgements ack ON ack.alert_id = a.id \
             WHERE a.id = $1 \
             FOR UPDATE OF a",
        )
        .bind(alert_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((machine_serial, stored_status, has_ack)) = row else {
            return Ok(ResolveOutcome::AlertNotFound);
        };

        let current = effective_status(&stored_status, has_ack);
        if current.transition(AlertStatus::Resolved).is_err() {
            return Ok(ResolveOutcome::AlreadyResolved);
        }

        sqlx::query("UPDATE alerts SET status = 'resolved' WHERE id = $1")
            .bind(alert_id)
            .execute(&mut *tx)
            .await?;

        let highest: Option<(String,)> = sqlx::query_as(
            "SELECT severity FROM alerts \
             WHERE machine_serial = $1 AND status <> 'resolved' \
             ORDER BY priority \
             LIMIT 1",
        )
        .bind(&machine_serial)
        .fetch_optional(&mut *tx)
        .await?;

        let machine_status =
            status_from_open_alerts(highest.and_then(|(s,)| Severity::parse(&s))).to_string();

        sqlx::query("UPDATE machines SET status = $2 WHERE serial = $1")
            .bind(&machine_serial)
            .bind(&machine_status)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ResolveOutcome::Resolved { machine_status })
    }
}

/// Derive the effective status the same way the SQL views do.
fn effective_status(stored: &str, has_ack: bool) -> AlertStatus {
    match AlertStatus::parse(stored) {
        Some(AlertStatus::Resolved) => AlertStatus::Resolved,
        _ if has_ack => AlertStatus::Acknowledged,
        Some(AlertStatus::Acknowledged) | None => AlertStatus::Open,
        Some(status) => status,
    }
}

/// Whether a sqlx error is a PostgreSQL unique violation (23505) on the
/// named constraint.
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

//! Repository for the `machines` table.

use mainsight_core::projection::status_from_open_alerts;
use mainsight_core::severity::Severity;
use sqlx::PgPool;

use crate::models::machine::{CreateMachine, Machine};

/// Column list for `machines` queries.
const COLUMNS: &str = "serial, name, machine_type, location, status, installed_at, created_at";

/// Provides fleet lookup and status projection maintenance.
pub struct MachineRepo;

impl MachineRepo {
    /// Register a machine. Existing serials are left untouched.
    ///
    /// Returns `true` if a new row was inserted.
    pub async fn create(pool: &PgPool, input: &CreateMachine) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO machines (serial, name, machine_type, location, installed_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (serial) DO NOTHING",
        )
        .bind(&input.serial)
        .bind(&input.name)
        .bind(&input.machine_type)
        .bind(&input.location)
        .bind(input.installed_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List machines, optionally filtered by projected status.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Machine>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM machines \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY serial \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Machine>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a machine by serial number.
    pub async fn find_by_serial(
        pool: &PgPool,
        serial: &str,
    ) -> Result<Option<Machine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM machines WHERE serial = $1");
        sqlx::query_as::<_, Machine>(&query)
            .bind(serial)
            .fetch_optional(pool)
            .await
    }

    /// Recompute the status projection from unresolved alert state.
    ///
    /// Idempotent: derives the status from the highest-severity alert that
    /// is not yet resolved, or `normal` when none remain. Returns the new
    /// status, or `None` if the machine does not exist.
    pub async fn recompute_status(
        pool: &PgPool,
        serial: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<(String,)> =
            sqlx::query_as("SELECT serial FROM machines WHERE serial = $1 FOR UPDATE")
                .bind(serial)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let highest: Option<(String,)> = sqlx::query_as(
            "SELECT severity FROM alerts \
             WHERE machine_serial = $1 AND status <> 'resolved' \
             ORDER BY priority \
             LIMIT 1",
        )
        .bind(serial)
        .fetch_optional(&mut *tx)
        .await?;

        let status =
            status_from_open_alerts(highest.and_then(|(s,)| Severity::parse(&s))).to_string();

        sqlx::query("UPDATE machines SET status = $2 WHERE serial = $1")
            .bind(serial)
            .bind(&status)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(status))
    }
}

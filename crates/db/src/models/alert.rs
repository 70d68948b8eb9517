//! Alert and acknowledgement entity models and DTOs.

use mainsight_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alerts` table.
///
/// The `status` column is a cache; list/detail queries derive the
/// effective status from acknowledgement existence instead of trusting it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: String,
    pub prediction_id: Option<DbId>,
    pub machine_serial: String,
    pub status: String,
    pub severity: String,
    pub priority: i16,
    pub title: String,
    pub description: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// An acknowledgement joined with the acknowledging user's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Acknowledgement {
    pub alert_id: String,
    pub acknowledged_by: DbId,
    pub acknowledged_by_name: String,
    pub acknowledged_at: Timestamp,
}

/// Detail view of an alert: machine context, derived status, and
/// acknowledgement info when present.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertDetail {
    pub id: String,
    pub prediction_id: Option<DbId>,
    pub machine_serial: String,
    pub machine_name: String,
    pub location: String,
    /// Effective status, derived from acknowledgement existence.
    pub status: String,
    pub severity: String,
    pub priority: i16,
    pub title: String,
    pub description: String,
    pub acknowledged_by: Option<DbId>,
    pub acknowledged_by_name: Option<String>,
    pub acknowledged_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Result of an acknowledgement attempt. Exactly one caller wins a race;
/// losers receive the winner's acknowledgement.
#[derive(Debug)]
pub enum AckOutcome {
    /// This request inserted the acknowledgement.
    Acknowledged(Acknowledgement),
    /// Another request (possibly concurrent) already holds the alert.
    AlreadyAcknowledged(Acknowledgement),
    /// No alert exists with the given id.
    AlertNotFound,
}

/// Result of a resolution attempt.
#[derive(Debug)]
pub enum ResolveOutcome {
    /// The alert is now resolved; carries the machine's recomputed status.
    Resolved { machine_status: String },
    /// No alert exists with the given id.
    AlertNotFound,
    /// The alert was already resolved.
    AlreadyResolved,
}

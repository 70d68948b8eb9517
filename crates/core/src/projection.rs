//! Machine status projection.
//!
//! `machines.status` is a denormalized cache for fast display, not a
//! source of truth. The authoritative signal is the machine's unresolved
//! alert state. Both the write-time projection (applied when a prediction
//! lands) and the recompute path (from unresolved alerts) go through the
//! policy functions here so the mapping lives in exactly one place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Displayed operational status of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Normal,
    Warning,
    Critical,
}

impl MachineStatus {
    /// Canonical lowercase name, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Normal => "normal",
            MachineStatus::Warning => "warning",
            MachineStatus::Critical => "critical",
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" | "active" => Some(MachineStatus::Normal),
            "warning" => Some(MachineStatus::Warning),
            "critical" => Some(MachineStatus::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write-time projection: the status a machine should display after a
/// prediction resolves for it.
///
/// High-severity failure predictions mark the machine critical; lower
/// severities mark it warning. A non-failure prediction returns it to
/// normal.
pub fn project_status(predicted_failure: bool, severity: Severity) -> MachineStatus {
    if !predicted_failure {
        return MachineStatus::Normal;
    }
    match severity {
        Severity::High => MachineStatus::Critical,
        Severity::Medium | Severity::Low => MachineStatus::Warning,
    }
}

/// Recompute path: derive the status from the highest-severity unresolved
/// alert, or `Normal` when none remain.
///
/// Idempotent — safe to run at any time, and consistent with
/// [`project_status`] for the alert that projection would have created.
pub fn status_from_open_alerts(highest_open_severity: Option<Severity>) -> MachineStatus {
    match highest_open_severity {
        Some(Severity::High) => MachineStatus::Critical,
        Some(Severity::Medium) | Some(Severity::Low) => MachineStatus::Warning,
        None => MachineStatus::Normal,
    }
}

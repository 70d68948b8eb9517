//! Alert lifecycle: status state machine, id token generation, and the
//! prediction-to-alert creation decision.
//!
//! Alerts move `Open -> Acknowledged -> Resolved`. An externally-driven
//! resolution may skip acknowledgement (`Open -> Resolved`); that escape
//! hatch is intentional. `Resolved` is terminal and no state is
//! re-enterable.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::failure::display_label;
use crate::severity::Severity;

/// Lifecycle status of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    /// Canonical lowercase name, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Open => "open",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Resolved => "resolved",
        }
    }

    /// Parse a stored status string. The original system wrote both
    /// `open` and `active` for freshly created alerts; both are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" | "active" => Some(AlertStatus::Open),
            "acknowledged" => Some(AlertStatus::Acknowledged),
            "resolved" => Some(AlertStatus::Resolved),
            _ => None,
        }
    }

    /// Whether moving from `self` to `to` is a legal transition.
    pub fn can_transition(&self, to: AlertStatus) -> bool {
        matches!(
            (self, to),
            (AlertStatus::Open, AlertStatus::Acknowledged)
                | (AlertStatus::Acknowledged, AlertStatus::Resolved)
                // External resolution may bypass acknowledgement.
                | (AlertStatus::Open, AlertStatus::Resolved)
        )
    }

    /// Validate a transition, failing with [`CoreError::InvalidTransition`].
    pub fn transition(&self, to: AlertStatus) -> Result<AlertStatus, CoreError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(CoreError::InvalidTransition { from: *self, to })
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a globally unique alert id token for a machine.
///
/// UUIDv7 is timestamp-ordered, so tokens sort by creation time within a
/// machine while remaining collision-free under concurrent creation.
pub fn new_alert_id(machine_serial: &str) -> String {
    format!("AL-{}-{}", machine_serial, Uuid::now_v7())
}

/// A fully derived alert, ready to insert. Produced by
/// [`AlertDraft::from_prediction`] when a prediction warrants one.
#[derive(Debug, Clone)]
pub struct AlertDraft {
    pub id: String,
    pub machine_serial: String,
    pub severity: Severity,
    pub priority: i16,
    pub title: String,
    pub description: String,
}

impl AlertDraft {
    /// The alert creation decision: a prediction materializes an alert iff
    /// its label indicates failure. Returns `None` for the negative class.
    pub fn from_prediction(
        machine_serial: &str,
        predicted_failure: bool,
        severity: Severity,
        failure_type: Option<&str>,
    ) -> Option<Self> {
        if !predicted_failure {
            return None;
        }

        let cause = failure_type.map(display_label);
        let title = match &cause {
            Some(label) => format!("{label} predicted on {machine_serial}"),
            None => format!("Failure predicted on {machine_serial}"),
        };
        let description = match &cause {
            Some(label) => format!(
                "The classifier flagged machine {machine_serial} for {label} \
                 with {severity} severity. Inspection recommended."
            ),
            None => format!(
                "The classifier flagged machine {machine_serial} for an \
                 unspecified failure with {severity} severity. Inspection recommended."
            ),
        };

        Some(AlertDraft {
            id: new_alert_id(machine_serial),
            machine_serial: machine_serial.to_string(),
            severity,
            priority: severity.priority(),
            title,
            description,
        })
    }
}

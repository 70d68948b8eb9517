//! Machine failure type taxonomy.
//!
//! The classifier reports failure types using the AI4I dataset codes.
//! Unknown labels are passed through verbatim rather than rejected, since
//! the ML service's vocabulary may grow independently of this backend.

use serde::{Deserialize, Serialize};

/// Known machine failure modes, as reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureType {
    /// Tool wear failure (TWF).
    ToolWear,
    /// Heat dissipation failure (HDF).
    HeatDissipation,
    /// Power failure (PWF).
    Power,
    /// Overstrain failure (OSF).
    Overstrain,
    /// Random failure (RNF).
    Random,
}

impl FailureType {
    /// Canonical short code, as stored in the database.
    pub fn code(&self) -> &'static str {
        match self {
            FailureType::ToolWear => "TWF",
            FailureType::HeatDissipation => "HDF",
            FailureType::Power => "PWF",
            FailureType::Overstrain => "OSF",
            FailureType::Random => "RNF",
        }
    }

    /// Human-readable name, used in alert titles and descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            FailureType::ToolWear => "Tool Wear Failure",
            FailureType::HeatDissipation => "Heat Dissipation Failure",
            FailureType::Power => "Power Failure",
            FailureType::Overstrain => "Overstrain Failure",
            FailureType::Random => "Random Failure",
        }
    }

    /// Parse a classifier-reported label. Accepts both the short code and
    /// the long form, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "TWF" | "TOOL WEAR FAILURE" => Some(FailureType::ToolWear),
            "HDF" | "HEAT DISSIPATION FAILURE" => Some(FailureType::HeatDissipation),
            "PWF" | "POWER FAILURE" => Some(FailureType::Power),
            "OSF" | "OVERSTRAIN FAILURE" => Some(FailureType::Overstrain),
            "RNF" | "RANDOM FAILURE" => Some(FailureType::Random),
            _ => None,
        }
    }
}

/// Resolve a raw classifier label into a display string.
///
/// Known codes map to their long form; unknown labels pass through as-is.
pub fn display_label(raw: &str) -> String {
    match FailureType::parse(raw) {
        Some(ft) => ft.label().to_string(),
        None => raw.to_string(),
    }
}

//! Confidence-to-severity classification.
//!
//! Maps a classifier confidence score in `[0.0, 1.0]` onto a discrete
//! severity tier used for alert prioritization. The thresholds here are
//! the single source for the mapping; no call site hardcodes them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Confidence at or above this is classified [`Severity::High`].
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Confidence at or above this (but below [`HIGH_CONFIDENCE`]) is
/// classified [`Severity::Medium`].
pub const MEDIUM_CONFIDENCE: f64 = 0.6;

/// Discrete severity tier for a prediction or alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Canonical lowercase name, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Parse a stored severity string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }

    /// Display priority derived from severity: 1 is most urgent.
    pub fn priority(&self) -> i16 {
        match self {
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a confidence score into a severity tier.
///
/// The caller is responsible for passing a score in `[0.0, 1.0]`; values
/// outside that range (including NaN) are a contract violation and fail
/// with [`CoreError::InvalidConfidence`].
pub fn classify(confidence: f64) -> Result<Severity, CoreError> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(CoreError::InvalidConfidence(confidence));
    }

    Ok(if confidence >= HIGH_CONFIDENCE {
        Severity::High
    } else if confidence >= MEDIUM_CONFIDENCE {
        Severity::Medium
    } else {
        Severity::Low
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn boundaries_classify_exactly() {
        // Closed lower bounds: 0.8 is high, 0.6 is medium.
        assert_eq!(classify(0.8).unwrap(), Severity::High);
        assert_eq!(classify(0.6).unwrap(), Severity::Medium);
        assert_eq!(classify(1.0).unwrap(), Severity::High);
        assert_eq!(classify(0.0).unwrap(), Severity::Low);
    }

    #[test]
    fn tiers_cover_the_unit_interval() {
        assert_eq!(classify(0.95).unwrap(), Severity::High);
        assert_eq!(classify(0.7).unwrap(), Severity::Medium);
        assert_eq!(classify(0.59).unwrap(), Severity::Low);
        assert_eq!(classify(0.3).unwrap(), Severity::Low);
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        assert_matches!(classify(-0.01), Err(CoreError::InvalidConfidence(_)));
        assert_matches!(classify(1.01), Err(CoreError::InvalidConfidence(_)));
        assert_matches!(classify(f64::NAN), Err(CoreError::InvalidConfidence(_)));
    }

    #[test]
    fn priority_orders_by_urgency() {
        assert!(Severity::High.priority() < Severity::Medium.priority());
        assert!(Severity::Medium.priority() < Severity::Low.priority());
    }

    #[test]
    fn round_trips_through_storage_form() {
        for sev in [Severity::Low, Severity::Medium, Severity::High] {
            assert_eq!(Severity::parse(sev.as_str()), Some(sev));
        }
        assert_eq!(Severity::parse("catastrophic"), None);
    }
}

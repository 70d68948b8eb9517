//! Sensor reading range validation.
//!
//! Ranges follow the AI4I predictive-maintenance dataset the classifier
//! was trained on, widened by a small tolerance. Readings outside these
//! bounds are rejected before they reach storage or the classifier.

use crate::error::CoreError;

/// Accepted air temperature range in Kelvin (dataset 295-305 K, ±5 K).
pub const AIR_TEMPERATURE_K: (f64, f64) = (290.0, 310.0);

/// Accepted process temperature range in Kelvin (dataset 305-315 K, ±5 K).
pub const PROCESS_TEMPERATURE_K: (f64, f64) = (300.0, 320.0);

/// Accepted rotational speed range in RPM.
pub const ROTATIONAL_SPEED_RPM: (f64, f64) = (1000.0, 3000.0);

/// Accepted torque range in Nm.
pub const TORQUE_NM: (f64, f64) = (0.0, 100.0);

/// Accepted tool wear range in minutes (dataset max 253, allow up to 300).
pub const TOOL_WEAR_MIN: (f64, f64) = (0.0, 300.0);

/// Maximum number of readings accepted in one batch request.
pub const MAX_BATCH_SIZE: usize = 100;

fn check_range(value: f64, (min, max): (f64, f64), name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || value < min || value > max {
        return Err(CoreError::Validation(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

/// The sensor quantities carried by one telemetry reading.
#[derive(Debug, Clone, Copy)]
pub struct ReadingValues {
    pub air_temperature_k: f64,
    pub process_temperature_k: f64,
    pub rotational_speed_rpm: i32,
    pub torque_nm: f64,
    pub tool_wear_min: i32,
}

/// Validate all quantities of a reading against the accepted ranges.
///
/// Returns the first violation as a [`CoreError::Validation`] naming the
/// offending field.
pub fn validate_reading(values: &ReadingValues) -> Result<(), CoreError> {
    check_range(values.air_temperature_k, AIR_TEMPERATURE_K, "air_temperature_k")?;
    check_range(
        values.process_temperature_k,
        PROCESS_TEMPERATURE_K,
        "process_temperature_k",
    )?;
    check_range(
        f64::from(values.rotational_speed_rpm),
        ROTATIONAL_SPEED_RPM,
        "rotational_speed_rpm",
    )?;
    check_range(values.torque_nm, TORQUE_NM, "torque_nm")?;
    check_range(f64::from(values.tool_wear_min), TOOL_WEAR_MIN, "tool_wear_min")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> ReadingValues {
        ReadingValues {
            air_temperature_k: 298.4,
            process_temperature_k: 308.9,
            rotational_speed_rpm: 1551,
            torque_nm: 42.1,
            tool_wear_min: 108,
        }
    }

    #[test]
    fn nominal_reading_passes() {
        assert!(validate_reading(&nominal()).is_ok());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let mut v = nominal();
        v.air_temperature_k = 290.0;
        v.tool_wear_min = 300;
        assert!(validate_reading(&v).is_ok());
    }

    #[test]
    fn violations_name_the_field() {
        let mut v = nominal();
        v.process_temperature_k = 345.0;
        let err = validate_reading(&v).unwrap_err();
        assert!(err.to_string().contains("process_temperature_k"));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut v = nominal();
        v.torque_nm = f64::NAN;
        assert!(validate_reading(&v).is_err());
    }
}

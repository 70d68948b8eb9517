/// All generated database primary keys are PostgreSQL BIGSERIAL.
///
/// Machines are the exception (keyed by serial number, TEXT) as are
/// alerts (keyed by a generated token, see [`crate::alert::new_alert_id`]).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

//! Domain-level error taxonomy.
//!
//! The HTTP layer (`mainsight-api`) maps these onto status codes; see
//! `AppError` there. Variants that carry user identity (such as
//! [`CoreError::AlreadyAcknowledged`]) do so because the caller is
//! expected to surface that identity to the client.

use crate::alert::AlertStatus;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The named entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A classifier confidence outside `[0.0, 1.0]` reached the severity
    /// classifier. Indicates a contract violation upstream, never user input.
    #[error("confidence {0} is outside [0.0, 1.0]")]
    InvalidConfidence(f64),

    /// The alert was already acknowledged by another user. Carries the
    /// original acknowledger's name so the caller can report who holds it.
    #[error("alert already acknowledged by {acknowledged_by}")]
    AlreadyAcknowledged { acknowledged_by: String },

    /// A disallowed alert status transition was requested.
    #[error("invalid alert transition: {from} -> {to}")]
    InvalidTransition { from: AlertStatus, to: AlertStatus },

    /// Invalid input data with a human-readable explanation.
    #[error("{0}")]
    Validation(String),

    /// Authentication failure.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not permitted.
    #[error("{0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("{0}")]
    Internal(String),
}

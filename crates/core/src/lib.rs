//! Domain logic for the predictive-maintenance platform.
//!
//! Pure logic — no database or network access. The `db` crate owns
//! persistence and the `ml` crate owns the classifier client; everything
//! here is deterministic and unit-testable in isolation.

pub mod alert;
pub mod error;
pub mod failure;
pub mod projection;
pub mod reading;
pub mod severity;
pub mod types;

//! Machine entity models and DTOs.

use mainsight_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `machines` table.
///
/// `status` is a projection cache (see `mainsight_core::projection`);
/// treat it as display data, not as authority.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Machine {
    pub serial: String,
    pub name: String,
    pub machine_type: String,
    pub location: String,
    pub status: String,
    pub installed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for registering a machine (used by seeding and fleet setup).
#[derive(Debug, Deserialize)]
pub struct CreateMachine {
    pub serial: String,
    pub name: String,
    pub machine_type: String,
    pub location: String,
    pub installed_at: Option<Timestamp>,
}

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the write paths that exist for that entity
//!
//! Status and severity columns are stored as their canonical lowercase
//! strings; the enums in `mainsight-core` own parsing and transitions.

pub mod alert;
pub mod chat;
pub mod dashboard;
pub mod machine;
pub mod prediction;
pub mod sensor_reading;
pub mod user;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must be atomic
//! open their own transaction internally.

pub mod alert_repo;
pub mod chat_repo;
pub mod dashboard_repo;
pub mod machine_repo;
pub mod prediction_repo;
pub mod sensor_reading_repo;
pub mod user_repo;

pub use alert_repo::AlertRepo;
pub use chat_repo::ChatRepo;
pub use dashboard_repo::DashboardRepo;
pub use machine_repo::MachineRepo;
pub use prediction_repo::PredictionRepo;
pub use sensor_reading_repo::SensorReadingRepo;
pub use user_repo::UserRepo;

//! HTTP request handlers, grouped by resource.

pub mod alerts;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod machines;
pub mod predictions;
pub mod sensor_data;

//! Route definitions for the `/sensor-data` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sensor_data;
use crate::state::AppState;

/// Routes mounted at `/sensor-data`.
///
/// ```text
/// POST /         -> create_reading
/// GET  /         -> reading_history
/// POST /batch    -> create_batch
/// GET  /latest   -> latest_reading
/// GET  /stats    -> reading_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(sensor_data::create_reading).get(sensor_data::reading_history),
        )
        .route("/batch", post(sensor_data::create_batch))
        .route("/latest", get(sensor_data::latest_reading))
        .route("/stats", get(sensor_data::reading_stats))
}

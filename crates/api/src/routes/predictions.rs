//! Route definitions for the `/predictions` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::predictions;
use crate::state::AppState;

/// Routes mounted at `/predictions`.
///
/// ```text
/// POST /analyze  -> analyze
/// GET  /         -> list_predictions
/// GET  /latest   -> latest_prediction
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(predictions::analyze))
        .route("/", get(predictions::list_predictions))
        .route("/latest", get(predictions::latest_prediction))
}

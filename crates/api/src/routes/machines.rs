//! Route definitions for the `/machines` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::machines;
use crate::state::AppState;

/// Routes mounted at `/machines`.
///
/// ```text
/// GET  /                            -> list_machines
/// GET  /{serial}                    -> get_machine
/// POST /{serial}/recompute-status   -> recompute_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(machines::list_machines))
        .route("/{serial}", get(machines::get_machine))
        .route(
            "/{serial}/recompute-status",
            post(machines::recompute_status),
        )
}

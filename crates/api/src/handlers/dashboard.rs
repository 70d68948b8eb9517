//! Handlers for the `/dashboard` resource.

use axum::extract::State;
use axum::Json;
use mainsight_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Number of daily buckets in the trend chart.
const TREND_DAYS: i32 = 7;

/// Number of alerts in the recent-alerts feed.
const RECENT_ALERTS: i64 = 5;

/// GET /api/v1/dashboard/summary
///
/// Fleet-level header figures.
pub async fn summary(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let summary = DashboardRepo::summary(&state.pool).await?;

    Ok(Json(serde_json::json!({ "data": summary })))
}

/// GET /api/v1/dashboard/trends
///
/// Seven daily buckets of fleet telemetry averages plus the most recent
/// unresolved alerts.
pub async fn trends(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let trends = DashboardRepo::trends(&state.pool, TREND_DAYS).await?;
    let recent_alerts = DashboardRepo::recent_alerts(&state.pool, RECENT_ALERTS).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "trends": trends,
            "recent_alerts": recent_alerts,
        }
    })))
}

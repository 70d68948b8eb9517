//! Handlers for the `/alerts` resource: listing, detail, the
//! acknowledgement guard, and resolution.

use axum::extract::{Path, Query, State};
use axum::Json;
use mainsight_core::alert::AlertStatus;
use mainsight_core::error::CoreError;
use mainsight_core::severity::Severity;
use mainsight_db::models::alert::{AckOutcome, ResolveOutcome};
use mainsight_db::repositories::AlertRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /alerts`.
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    /// Filter by derived status (`open` | `acknowledged` | `resolved`).
    pub status: Option<String>,
    /// Filter by severity (`low` | `medium` | `high`).
    pub severity: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for alert listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for alert listing.
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/alerts
///
/// List alerts, newest first, with optional status/severity filters.
/// Status is the derived value, so acknowledged alerts are reported as
/// such even if the stored column is stale.
pub async fn list_alerts(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<AlertQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let status = match params.status.as_deref() {
        Some(raw) => Some(
            AlertStatus::parse(raw)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!(
                        "unknown alert status filter: {raw}"
                    )))
                })?
                .as_str(),
        ),
        None => None,
    };
    let severity = match params.severity.as_deref() {
        Some(raw) => Some(
            Severity::parse(raw)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!(
                        "unknown severity filter: {raw}"
                    )))
                })?
                .as_str(),
        ),
        None => None,
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let alerts = AlertRepo::list(&state.pool, status, severity, limit, offset).await?;

    Ok(Json(serde_json::json!({ "data": alerts })))
}

/// GET /api/v1/alerts/{id}
///
/// Alert detail with machine context, acknowledger, and derived status.
pub async fn get_alert(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let detail = AlertRepo::find_detail(&state.pool, &alert_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Alert",
                id: alert_id.clone(),
            })
        })?;

    Ok(Json(serde_json::json!({ "data": detail })))
}

/// POST /api/v1/alerts/{id}/acknowledge
///
/// Claim an alert for the authenticated user. Exactly one caller wins
/// under concurrency; losers receive 409 naming the original
/// acknowledger.
pub async fn acknowledge_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let outcome = AlertRepo::acknowledge(&state.pool, &alert_id, auth.user_id).await?;

    match outcome {
        AckOutcome::Acknowledged(ack) => {
            tracing::info!(
                alert_id = %alert_id,
                user_id = ack.acknowledged_by,
                "alert acknowledged"
            );
            Ok(Json(serde_json::json!({
                "data": {
                    "alert_id": ack.alert_id,
                    "acknowledged_by": ack.acknowledged_by_name,
                    "acknowledged_by_id": ack.acknowledged_by,
                    "acknowledged_at": ack.acknowledged_at,
                }
            })))
        }
        AckOutcome::AlreadyAcknowledged(existing) => {
            Err(AppError::Core(CoreError::AlreadyAcknowledged {
                acknowledged_by: existing.acknowledged_by_name,
            }))
        }
        AckOutcome::AlertNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Alert",
            id: alert_id.clone(),
        })),
    }
}

/// POST /api/v1/alerts/{id}/resolve
///
/// Mark an alert resolved. Permitted from both `open` (external
/// resolution) and `acknowledged`; resolution is terminal.
pub async fn resolve_alert(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let outcome = AlertRepo::resolve(&state.pool, &alert_id).await?;

    match outcome {
        ResolveOutcome::Resolved { machine_status } => {
            tracing::info!(alert_id = %alert_id, "alert resolved");
            Ok(Json(serde_json::json!({
                "data": {
                    "alert_id": alert_id,
                    "status": AlertStatus::Resolved.as_str(),
                    "machine_status": machine_status,
                }
            })))
        }
        ResolveOutcome::AlreadyResolved => Err(AppError::Core(CoreError::InvalidTransition {
            from: AlertStatus::Resolved,
            to: AlertStatus::Resolved,
        })),
        ResolveOutcome::AlertNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Alert",
            id: alert_id.clone(),
        })),
    }
}

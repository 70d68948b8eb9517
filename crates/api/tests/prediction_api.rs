//! Integration tests for the prediction workflow edge cases.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{analyze_body, body_json, post_json, seed_machine, seed_user, MockMlEngine, MockVerdict};
use sqlx::PgPool;

async fn alert_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM alerts")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn prediction_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM predictions")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Test: negative class stores the prediction but never an alert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_class_creates_no_alert(pool: PgPool) {
    let ml = Arc::new(MockMlEngine {
        verdict: MockVerdict::Normal { confidence: 0.12 },
    });
    let app = common::build_test_app(pool.clone(), ml);
    seed_machine(&pool, "SN-001").await;
    let (_, token) = seed_user(&pool, "tech-1", "tech1@example.com").await;

    let response = post_json(
        app.clone(),
        "/api/v1/predictions/analyze",
        analyze_body("SN-001"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["data"]["alert"].is_null());
    assert_eq!(json["data"]["prediction"]["predicted_failure"], false);
    assert_eq!(json["data"]["machine_status"], "normal");

    assert_eq!(prediction_count(&pool).await, 1);
    assert_eq!(alert_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Test: classifier outage surfaces as 503 with no partial writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn classifier_outage_returns_503_and_stores_nothing(pool: PgPool) {
    let ml = Arc::new(MockMlEngine {
        verdict: MockVerdict::Unavailable,
    });
    let app = common::build_test_app(pool.clone(), ml);
    seed_machine(&pool, "SN-001").await;
    let (_, token) = seed_user(&pool, "tech-1", "tech1@example.com").await;

    let response = post_json(
        app.clone(),
        "/api/v1/predictions/analyze",
        analyze_body("SN-001"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");

    let readings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sensor_readings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(readings, 0);
    assert_eq!(prediction_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Test: unknown machine fails with 404 before any side effect
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_machine_returns_404(pool: PgPool) {
    let ml = Arc::new(MockMlEngine {
        verdict: MockVerdict::Failure {
            confidence: 0.9,
            failure_type: Some("PWF"),
        },
    });
    let app = common::build_test_app(pool.clone(), ml);
    let (_, token) = seed_user(&pool, "tech-1", "tech1@example.com").await;

    let response = post_json(
        app.clone(),
        "/api/v1/predictions/analyze",
        analyze_body("SN-404"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(prediction_count(&pool).await, 0);
    assert_eq!(alert_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Test: out-of-range telemetry is rejected before the classifier is called
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_reading_returns_400(pool: PgPool) {
    let ml = Arc::new(MockMlEngine {
        verdict: MockVerdict::Failure {
            confidence: 0.9,
            failure_type: None,
        },
    });
    let app = common::build_test_app(pool.clone(), ml);
    seed_machine(&pool, "SN-001").await;
    let (_, token) = seed_user(&pool, "tech-1", "tech1@example.com").await;

    let mut body = analyze_body("SN-001");
    body["sensor_data"]["torque_nm"] = serde_json::json!(240.0);

    let response = post_json(
        app.clone(),
        "/api/v1/predictions/analyze",
        body,
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(prediction_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Test: an out-of-contract confidence from the classifier is an internal
// error, not a stored prediction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_contract_confidence_is_internal_error(pool: PgPool) {
    let ml = Arc::new(MockMlEngine {
        verdict: MockVerdict::Failure {
            confidence: 1.4,
            failure_type: None,
        },
    });
    let app = common::build_test_app(pool.clone(), ml);
    seed_machine(&pool, "SN-001").await;
    let (_, token) = seed_user(&pool, "tech-1", "tech1@example.com").await;

    let response = post_json(
        app.clone(),
        "/api/v1/predictions/analyze",
        analyze_body("SN-001"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(prediction_count(&pool).await, 0);
}

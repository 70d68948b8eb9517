//! Integration tests for login and profile.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, seed_user, MockMlEngine, MockVerdict};
use sqlx::PgPool;

fn mock_ml() -> Arc<MockMlEngine> {
    Arc::new(MockMlEngine {
        verdict: MockVerdict::Normal { confidence: 0.1 },
    })
}

// ---------------------------------------------------------------------------
// Test: login with valid credentials returns a usable token
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_usable_token(pool: PgPool) {
    let app = common::build_test_app(pool.clone(), mock_ml());
    seed_user(&pool, "Tech One", "tech1@example.com").await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "tech1@example.com", "password": "password123" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "tech1@example.com");
    assert_eq!(json["user"]["role"], "technician");
    let token = json["token"].as_str().expect("token").to_string();

    let response = get_auth(app.clone(), "/api/v1/auth/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Tech One");
}

// ---------------------------------------------------------------------------
// Test: wrong password is rejected without leaking which part was wrong
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone(), mock_ml());
    seed_user(&pool, "Tech One", "tech1@example.com").await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "tech1@example.com", "password": "nope" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

// ---------------------------------------------------------------------------
// Test: unknown email gets the same rejection as a wrong password
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_email_gets_same_rejection(pool: PgPool) {
    let app = common::build_test_app(pool.clone(), mock_ml());

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ghost@example.com", "password": "password123" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

// ---------------------------------------------------------------------------
// Test: deactivated accounts cannot log in
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_account_is_forbidden(pool: PgPool) {
    let app = common::build_test_app(pool.clone(), mock_ml());
    seed_user(&pool, "Tech One", "tech1@example.com").await;
    sqlx::query("UPDATE users SET is_active = false WHERE email = 'tech1@example.com'")
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "tech1@example.com", "password": "password123" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

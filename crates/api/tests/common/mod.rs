//! Shared test harness: app construction with the full middleware stack,
//! an ML engine double, and request/seeding helpers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use mainsight_core::types::DbId;
use mainsight_db::models::machine::CreateMachine;
use mainsight_db::repositories::{MachineRepo, UserRepo};
use mainsight_ml::{ChatResponse, MlEngine, MlError, PredictRequest, PredictResponse};
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use mainsight_api::auth::jwt::{generate_access_token, JwtConfig};
use mainsight_api::auth::password::hash_password;
use mainsight_api::config::{MlSettings, ServerConfig};
use mainsight_api::routes;
use mainsight_api::state::AppState;

// ---------------------------------------------------------------------------
// ML engine double
// ---------------------------------------------------------------------------

/// Scripted classifier behaviour for tests.
#[derive(Debug, Clone)]
pub enum MockVerdict {
    /// Classifier reports the failure class.
    Failure {
        confidence: f64,
        failure_type: Option<&'static str>,
    },
    /// Classifier reports the negative class.
    Normal { confidence: f64 },
    /// The service is unreachable.
    Unavailable,
}

/// ML engine double returning a scripted verdict.
pub struct MockMlEngine {
    pub verdict: MockVerdict,
}

#[async_trait]
impl MlEngine for MockMlEngine {
    async fn predict(&self, _request: &PredictRequest) -> Result<PredictResponse, MlError> {
        match &self.verdict {
            MockVerdict::Failure {
                confidence,
                failure_type,
            } => Ok(PredictResponse {
                predicted_label: 1,
                confidence: *confidence,
                failure_type: failure_type.map(str::to_string),
            }),
            MockVerdict::Normal { confidence } => Ok(PredictResponse {
                predicted_label: 0,
                confidence: *confidence,
                failure_type: None,
            }),
            MockVerdict::Unavailable => Err(MlError::Api {
                status: 503,
                body: "service down".to_string(),
            }),
        }
    }

    async fn chat(&self, question: &str) -> Result<ChatResponse, MlError> {
        match &self.verdict {
            MockVerdict::Unavailable => Err(MlError::Api {
                status: 503,
                body: "service down".to_string(),
            }),
            _ => Ok(ChatResponse {
                response: Some(format!("echo: {question}")),
                machine_status: None,
                failure_type: None,
                extra: serde_json::Map::new(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-value".to_string(),
            access_token_expiry_mins: 60,
        },
        ml: MlSettings {
            predict_url: "http://localhost:8000/predict".to_string(),
            chatbot_url: "http://localhost:8000/chat".to_string(),
            timeout_secs: 30,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool and ML engine double.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(pool: PgPool, ml: Arc<dyn MlEngine>) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
        ml,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// GET a path without authentication.
pub async fn get(app: Router, path: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// GET a path with a bearer token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(path)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST a JSON body, optionally with a bearer token.
pub async fn post_json(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create a user and return its id plus a valid bearer token.
pub async fn seed_user(pool: &PgPool, name: &str, email: &str) -> (DbId, String) {
    let hash = hash_password("password123").expect("hashing should succeed");
    let user = UserRepo::create(pool, name, email, &hash, "technician")
        .await
        .expect("user seed should succeed");
    let token = generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user.id, token)
}

/// Register a machine for tests.
pub async fn seed_machine(pool: &PgPool, serial: &str) {
    MachineRepo::create(
        pool,
        &CreateMachine {
            serial: serial.to_string(),
            name: format!("Turbine {serial}"),
            machine_type: "M".to_string(),
            location: "Plant 1".to_string(),
            installed_at: None,
        },
    )
    .await
    .expect("machine seed should succeed");
}

/// A nominal analyze request body for the given machine.
pub fn analyze_body(serial: &str) -> serde_json::Value {
    serde_json::json!({
        "machine_serial": serial,
        "sensor_data": {
            "air_temperature_k": 300.4,
            "process_temperature_k": 311.2,
            "rotational_speed_rpm": 1538,
            "torque_nm": 46.3,
            "tool_wear_min": 108
        }
    })
}

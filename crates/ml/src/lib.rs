//! HTTP client for the external ML microservice.
//!
//! The service exposes two endpoints: a failure classifier and a
//! maintenance chatbot. Both are opaque — this crate owns the wire
//! contract and nothing else. Handlers depend on the [`MlEngine`] trait
//! rather than the concrete client so tests can substitute a double.

mod client;
mod error;

pub use client::MlClient;
pub use error::MlError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sensor quantities sent to the classifier, matching its training schema.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub rotational_speed: i32,
    pub torque: f64,
    pub tool_wear: i32,
}

/// Classifier verdict for one reading.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    /// Binary class: `1` indicates predicted failure, `0` the negative class.
    pub predicted_label: u8,
    /// Classifier confidence in `[0.0, 1.0]`. Range is validated by the
    /// caller, not here.
    pub confidence: f64,
    /// Failure mode label, present only for the failure class.
    #[serde(default)]
    pub failure_type: Option<String>,
}

impl PredictResponse {
    /// Whether the classifier predicted the failure class.
    pub fn is_failure(&self) -> bool {
        self.predicted_label != 0
    }
}

/// Chatbot reply. The service answers general questions with `response`
/// and machine-status questions with the status fields; callers map
/// whichever shape arrives.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub machine_status: Option<String>,
    #[serde(default)]
    pub failure_type: Option<String>,
    /// Remaining fields, preserved for message metadata.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The external classifier/chatbot, as seen by request handlers.
#[async_trait]
pub trait MlEngine: Send + Sync {
    /// Classify one sensor reading.
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, MlError>;

    /// Ask the maintenance chatbot a (possibly context-enriched) question.
    async fn chat(&self, question: &str) -> Result<ChatResponse, MlError>;
}

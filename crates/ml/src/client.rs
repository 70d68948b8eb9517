//! reqwest-backed implementation of [`MlEngine`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::MlError;
use crate::{ChatResponse, MlEngine, PredictRequest, PredictResponse};

/// HTTP client for the ML microservice.
pub struct MlClient {
    client: reqwest::Client,
    predict_url: String,
    chatbot_url: String,
}

impl MlClient {
    /// Create a client with a per-request timeout.
    ///
    /// * `predict_url` - Full URL of the classifier endpoint.
    /// * `chatbot_url` - Full URL of the chatbot endpoint.
    pub fn new(predict_url: String, chatbot_url: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("reqwest client construction cannot fail with these options");

        Self {
            client,
            predict_url,
            chatbot_url,
        }
    }

    /// POST a JSON body and decode a JSON response of type `T`.
    ///
    /// Non-2xx responses become [`MlError::Api`] with the raw body;
    /// undecodable 2xx bodies become [`MlError::InvalidResponse`].
    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, MlError> {
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MlError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| MlError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MlEngine for MlClient {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, MlError> {
        let body = serde_json::json!({
            "air_temperature": request.air_temperature,
            "process_temperature": request.process_temperature,
            "rotational_speed": request.rotational_speed,
            "torque": request.torque,
            "tool_wear": request.tool_wear,
        });

        tracing::debug!(url = %self.predict_url, "sending prediction request");
        self.post_json(&self.predict_url, &body).await
    }

    async fn chat(&self, question: &str) -> Result<ChatResponse, MlError> {
        let body = serde_json::json!({ "question": question });

        tracing::debug!(url = %self.chatbot_url, "sending chatbot request");
        self.post_json(&self.chatbot_url, &body).await
    }
}

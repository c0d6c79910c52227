use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::backend::{GenerateOptions, TextBackend};
use crate::embedding::{Embedding, EmbeddingBackend};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for an Anthropic-message-shaped completion endpoint.
/// Grounded on `beagle_llm::anthropic::client::AnthropicClient`'s request
/// building: a single `messages` endpoint, `x-api-key` auth header, and
/// tolerant extraction of the first text block in the response.
pub struct HttpTextBackend {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpTextBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl TextBackend for HttpTextBackend {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: GenerateOptions,
    ) -> anyhow::Result<String> {
        let body = json!({
            "model": options.model_id.unwrap_or_else(|| "default".to_string()),
            "system": system_prompt,
            "messages": [{"role": "user", "content": user_prompt}],
            "max_tokens": 1024,
            "temperature": options.temperature.unwrap_or(0.7),
        });

        debug!(url = %self.base_url, "sending completion request");

        let response = self
            .http
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("transport error calling text backend")?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .context("failed to decode backend response as JSON")?;

        if !status.is_success() {
            warn!(%status, body = %payload, "text backend returned an HTTP error");
            anyhow::bail!("text backend responded with status {status}: {payload}");
        }

        // Contract: model-level refusals surface as empty text, not an
        // error — only transport/HTTP failures bail above.
        Ok(extract_text(&payload).unwrap_or_default())
    }
}

fn extract_text(payload: &Value) -> Option<String> {
    let array = payload.get("content")?.as_array()?;
    let mut buffer = String::new();
    for item in array {
        if let Some(text) = item.get("text").and_then(Value::as_str) {
            buffer.push_str(text);
        }
    }
    if buffer.is_empty() {
        None
    } else {
        Some(buffer)
    }
}

/// HTTP client for a batch embedding endpoint. Grounded on
/// `beagle_llm::embedding::EmbeddingClient`.
pub struct HttpEmbeddingBackend {
    http: Client,
    base_url: String,
    model: String,
}

impl HttpEmbeddingBackend {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl EmbeddingBackend for HttpEmbeddingBackend {
    async fn embed(&self, text: &str) -> anyhow::Result<Embedding> {
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({ "model": self.model, "input": [text] });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("transport error calling embedding backend")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("embedding backend responded with status {status}: {text}");
        }

        let payload: Value = response
            .json()
            .await
            .context("failed to decode embedding response as JSON")?;

        let vector = payload
            .get("data")
            .and_then(Value::as_array)
            .and_then(|arr| arr.first())
            .and_then(|entry| entry.get("embedding"))
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("embedding response missing data[0].embedding"))?;

        vector
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32).ok_or_else(|| anyhow!("non-numeric embedding component")))
            .collect()
    }
}

//! OpenAI-compatible gateway provider.
//!
//! Works with LiteLLM proxies, OpenAI, OpenRouter, vLLM and any endpoint that
//! speaks `/chat/completions` and `/embeddings`.
//!
//! Supports:
//! - Chat completions, returned as the raw JSON body
//! - Streaming completions (SSE) as text deltas
//! - Embeddings
//! - Health checks via `/models`

use async_trait::async_trait;
use futures::StreamExt;
use riskcast_config::GatewayConfig;
use riskcast_core::error::ProviderError;
use riskcast_core::provider::*;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A provider for any OpenAI-compatible HTTP gateway.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    /// Applies to every request that does not carry its own timeout
    request_timeout: Option<Duration>,
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, ProviderError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))
}

impl OpenAiCompatProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client: build_client(None)?,
            request_timeout: None,
        })
    }

    /// A LiteLLM proxy (convenience constructor).
    pub fn litellm(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, ProviderError> {
        Self::new("litellm", base_url, api_key)
    }

    /// Gateway settings, with `timeout_secs` bounding every HTTP request.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ProviderError> {
        Self::litellm(config.base_url.clone(), config.api_key.clone())?
            .with_request_timeout(Duration::from_secs(config.timeout_secs))
    }

    /// Bound health checks, embeddings and completions sent without their
    /// own timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, ProviderError> {
        self.client = build_client(Some(timeout))?;
        self.request_timeout = Some(timeout);
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    fn post(&self, path: &str, timeout: Option<Duration>) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }

    fn completion_body(request: &ProviderRequest, stream: bool) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "stream": stream,
        })
    }

    fn transport_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }

    /// Map non-200 responses onto provider errors.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(5);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gateway returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> std::result::Result<RawCompletion, ProviderError> {
        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .post("/chat/completions", request.timeout)
            .json(&Self::completion_body(&request, false))
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = Self::check_status(response).await?;

        let body: serde_json::Value = response.json().await.map_err(|e| ProviderError::ApiError {
            status_code: 200,
            message: format!("Failed to parse response: {e}"),
        })?;
        Ok(RawCompletion(body))
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let mut builder = self.client.get(format!("{}/models", self.base_url));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await.map_err(Self::transport_error)?;
        Ok(response.status().is_success())
    }

    async fn embed(&self, request: EmbeddingRequest) -> std::result::Result<EmbeddingResponse, ProviderError> {
        let body = serde_json::json!({
            "model": request.model,
            "input": request.inputs,
            "encoding_format": "float",
        });

        debug!(
            provider = %self.name,
            model = %request.model,
            count = request.inputs.len(),
            "Sending embedding request"
        );

        let response = self
            .post("/embeddings", None)
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = Self::check_status(response).await?;

        let api_resp: EmbeddingApiResponse = response.json().await.map_err(|e| ProviderError::ApiError {
            status_code: 200,
            message: format!("Failed to parse embedding response: {e}"),
        })?;

        Ok(api_resp.into_response(request.model))
    }

    async fn stream(&self, request: ProviderRequest) -> std::result::Result<StreamReceiver, ProviderError> {
        debug!(provider = %self.name, model = %request.model, "Sending streaming request");

        let response = self
            .post("/chat/completions", request.timeout)
            .header("Accept", "text/event-stream")
            .json(&Self::completion_body(&request, true))
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = Self::check_status(response).await?;

        let (tx, rx) = tokio::sync::mpsc::channel(64);
        let provider_name = self.name.clone();

        // Read the SSE byte stream and forward content deltas
        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut lines = LineBuffer::default();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx.send(Err(ProviderError::StreamInterrupted(e.to_string()))).await;
                        return;
                    }
                };

                lines.extend(&bytes);

                while let Some(line) = lines.next_line() {
                    match parse_sse_line(&line) {
                        SseEvent::Skip => {}
                        SseEvent::Done => {
                            let _ = tx.send(Ok(StreamChunk { content: None, done: true })).await;
                            return;
                        }
                        SseEvent::Delta(content) => {
                            let chunk = StreamChunk {
                                content: Some(content),
                                done: false,
                            };
                            if tx.send(Ok(chunk)).await.is_err() {
                                return; // receiver dropped
                            }
                        }
                        SseEvent::Unparseable(error) => {
                            trace!(provider = %provider_name, error = %error, "Ignoring unparseable SSE chunk");
                        }
                    }
                }
            }

            // Stream ended without [DONE]
            let _ = tx.send(Ok(StreamChunk { content: None, done: true })).await;
        });

        Ok(rx)
    }
}

/// Splits a byte stream into lines. Bytes are held until their newline
/// arrives, so a UTF-8 character split across network chunks decodes whole.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// The next complete line without its `\n` or `\r\n`.
    fn next_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let raw: Vec<u8> = self.pending.drain(..=end).collect();
        let line = String::from_utf8_lossy(&raw[..end]);
        Some(line.trim_end_matches('\r').to_string())
    }
}

/// What one SSE line means for the text stream.
#[derive(Debug, PartialEq)]
enum SseEvent {
    Skip,
    Done,
    Delta(String),
    Unparseable(String),
}

fn parse_sse_line(line: &str) -> SseEvent {
    // Blank lines, comments and non-data fields carry no text
    let Some(data) = line.strip_prefix("data:") else {
        return SseEvent::Skip;
    };
    let data = data.trim();
    if data == "[DONE]" {
        return SseEvent::Done;
    }

    match serde_json::from_str::<StreamResponse>(data) {
        Ok(resp) => resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta.content)
            .filter(|c| !c.is_empty())
            .map_or(SseEvent::Skip, SseEvent::Delta),
        Err(e) => SseEvent::Unparseable(e.to_string()),
    }
}

// --- Embedding API types ---

#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

impl EmbeddingApiResponse {
    /// Embeddings in input order. Gateways may return `data` out of order,
    /// so entries carrying an `index` are sorted by it.
    fn into_response(mut self, requested_model: String) -> EmbeddingResponse {
        if self.data.iter().all(|d| d.index.is_some()) {
            self.data.sort_by_key(|d| d.index);
        }
        EmbeddingResponse {
            embeddings: self.data.into_iter().map(|d| d.embedding).collect(),
            model: self.model.unwrap_or(requested_model),
        }
    }
}

// --- Streaming SSE types ---

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

//! Provider trait: the abstraction over the hosted model gateway.
//!
//! A Provider knows how to send a conversation to a model and get the raw
//! response back, how to stream a response as text deltas, and how to embed
//! text. Response payloads differ between upstream models, so `complete`
//! hands back the JSON body untouched; turning it into text is the caller's
//! job (see `riskcast_providers::extract`).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gpt-4.1-mini", "claude-3-5-sonnet")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Per-request transport timeout
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl ProviderRequest {
    /// A request with gateway defaults for everything but model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The untouched JSON body of a completion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCompletion(pub serde_json::Value);

impl RawCompletion {
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for RawCompletion {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// A single chunk in a streaming response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Partial content delta
    #[serde(default)]
    pub content: Option<String>,

    /// Whether this is the final chunk
    #[serde(default)]
    pub done: bool,
}

/// An embedding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// The model to use for embeddings (e.g., "text-embedding-ada-002").
    pub model: String,

    /// The texts to embed.
    pub inputs: Vec<String>,
}

/// An embedding response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The embedding vectors, one per input text.
    pub embeddings: Vec<Vec<f32>>,

    /// Which model was used.
    pub model: String,
}

/// Receiving half of a streamed completion.
pub type StreamReceiver = tokio::sync::mpsc::Receiver<std::result::Result<StreamChunk, ProviderError>>;

/// The core Provider trait.
///
/// The pipeline calls `complete()`, `stream()` or `embed()` without knowing
/// which gateway sits behind it, which is what lets tests script responses.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "litellm").
    fn name(&self) -> &str;

    /// Send a request and get the complete response body.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<RawCompletion, ProviderError>;

    /// Send a request and get a stream of text deltas.
    ///
    /// Default implementation reports that streaming isn't supported.
    async fn stream(&self, _request: ProviderRequest) -> std::result::Result<StreamReceiver, ProviderError> {
        Err(ProviderError::NotConfigured(format!(
            "Provider '{}' does not support streaming",
            self.name()
        )))
    }

    /// Generate embeddings for the given texts.
    ///
    /// Default implementation returns an error indicating embeddings aren't supported.
    async fn embed(&self, _request: EmbeddingRequest) -> std::result::Result<EmbeddingResponse, ProviderError> {
        Err(ProviderError::NotConfigured(format!(
            "Provider '{}' does not support embeddings",
            self.name()
        )))
    }

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

/// Turns text into vectors for the document index.
///
/// `riskcast_providers::ModelCaller` implements this with the same retry
/// policy and per-attempt timeout it applies to completions.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order.
    async fn embed_texts(&self, model: &str, inputs: Vec<String>) -> std::result::Result<Vec<Vec<f32>>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl Provider for Bare {
        fn name(&self) -> &str {
            "bare"
        }

        async fn complete(&self, _request: ProviderRequest) -> std::result::Result<RawCompletion, ProviderError> {
            Ok(RawCompletion(serde_json::json!({"text": "ok"})))
        }
    }

    #[test]
    fn provider_request_defaults() {
        let req = ProviderRequest::new("gpt-4.1-mini", vec![Message::user("hi")]);
        assert!(req.timeout.is_none());
        let json = serde_json::to_value(req.clone().with_timeout(Duration::from_secs(5))).unwrap();
        assert!(json.get("timeout").is_none());
        assert_eq!(json["model"], "gpt-4.1-mini");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn embeddings_unsupported_by_default() {
        let err = Bare
            .embed(EmbeddingRequest {
                model: "m".into(),
                inputs: vec!["x".into()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(Bare.stream(ProviderRequest::new("m", vec![])).await.is_err());
    }
}

//! The model caller: one logical completion with retry, timeout and
//! text extraction.
//!
//! Failures never escape [`ModelCaller::call`]: after the last attempt the
//! error message is carried in [`CallResult::error`] and callers decide what
//! to do with it. [`ModelCaller::complete_once`] is the single-attempt variant
//! for stages that must propagate failure. [`ModelCaller::embed`] runs the
//! same attempt loop for embeddings and returns the last error.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use riskcast_config::AppConfig;
use riskcast_core::error::ProviderError;
use riskcast_core::message::Message;
use riskcast_core::provider::{Embedder, EmbeddingRequest, Provider, ProviderRequest, RawCompletion, StreamReceiver};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::extract::extract_text;
use crate::retry::RetryPolicy;

/// Normalized outcome of one model invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResult {
    pub content: String,
    pub latency_ms: u64,
    pub error: Option<String>,
}

impl CallResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The content, or the error message as a provider error.
    pub fn into_result(self) -> Result<String, ProviderError> {
        match self.error {
            None => Ok(self.content),
            Some(message) => Err(ProviderError::CallFailed(message)),
        }
    }
}

pub struct ModelCaller {
    provider: Arc<dyn Provider>,
    policy: RetryPolicy,
    timeout: Option<Duration>,
}

impl ModelCaller {
    /// Default retry policy, no per-attempt timeout.
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            policy: RetryPolicy::default(),
            timeout: None,
        }
    }

    /// Retry policy and timeout taken from configuration.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider)
            .with_policy(RetryPolicy::from(&config.retry))
            .with_timeout(Duration::from_secs(config.gateway.timeout_secs))
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn request(&self, model: &str, messages: Vec<Message>) -> ProviderRequest {
        let request = ProviderRequest::new(model, messages);
        match self.timeout {
            Some(timeout) => request.with_timeout(timeout),
            None => request,
        }
    }

    /// Await `work`, bounded by the timeout when set. Returns the outcome
    /// and its latency in milliseconds.
    async fn bounded<T>(&self, work: impl Future<Output = Result<T, ProviderError>>) -> (Result<T, ProviderError>, u64) {
        let start = Instant::now();
        let outcome = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, work).await.unwrap_or_else(|_| {
                Err(ProviderError::Timeout(format!(
                    "no response within {}ms",
                    timeout.as_millis()
                )))
            }),
            None => work.await,
        };
        (outcome, start.elapsed().as_millis() as u64)
    }

    async fn attempt(&self, request: ProviderRequest) -> (Result<RawCompletion, ProviderError>, u64) {
        self.bounded(self.provider.complete(request)).await
    }

    /// Call `model`, retrying per the policy. Never fails; check `error`.
    pub async fn call(&self, model: &str, messages: Vec<Message>) -> CallResult {
        let request = self.request(model, messages);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let (outcome, latency_ms) = self.attempt(request.clone()).await;

            match outcome {
                Ok(raw) => {
                    let content = extract_text(raw.as_value());
                    debug!(model, attempt, latency_ms, chars = content.len(), "Model call succeeded");
                    return CallResult {
                        content,
                        latency_ms,
                        error: None,
                    };
                }
                Err(e) => {
                    warn!(
                        model,
                        attempt,
                        max_attempts = self.policy.max_attempts(),
                        latency_ms,
                        error = %e,
                        "Model call failed"
                    );
                    if attempt > self.policy.max_retries {
                        return CallResult {
                            content: String::new(),
                            latency_ms,
                            error: Some(e.to_string()),
                        };
                    }
                    tokio::time::sleep(self.policy.delay_for(attempt)).await;
                }
            }
        }
    }

    /// A single attempt whose failure is returned to the caller.
    pub async fn complete_once(&self, model: &str, messages: Vec<Message>) -> Result<String, ProviderError> {
        let (outcome, latency_ms) = self.attempt(self.request(model, messages)).await;
        let raw = outcome?;
        debug!(model, latency_ms, "Single model call succeeded");
        Ok(extract_text(raw.as_value()))
    }

    /// Stream the completion as text deltas. No retry: a stream that has
    /// started cannot be replayed.
    pub async fn stream(&self, model: &str, messages: Vec<Message>) -> Result<StreamReceiver, ProviderError> {
        self.provider.stream(self.request(model, messages)).await
    }

    /// Embed `inputs` with `model`, retrying per the policy. After the last
    /// attempt the last error is returned.
    pub async fn embed(&self, model: &str, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request = EmbeddingRequest {
                model: model.to_string(),
                inputs: inputs.clone(),
            };
            let (outcome, latency_ms) = self.bounded(self.provider.embed(request)).await;

            match outcome {
                Ok(response) => {
                    debug!(model, attempt, latency_ms, vectors = response.embeddings.len(), "Embedding call succeeded");
                    return Ok(response.embeddings);
                }
                Err(e) => {
                    warn!(
                        model,
                        attempt,
                        max_attempts = self.policy.max_attempts(),
                        latency_ms,
                        error = %e,
                        "Embedding call failed"
                    );
                    if attempt > self.policy.max_retries {
                        return Err(e);
                    }
                    tokio::time::sleep(self.policy.delay_for(attempt)).await;
                }
            }
        }
    }
}

#[async_trait]
impl Embedder for ModelCaller {
    async fn embed_texts(&self, model: &str, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, ProviderError> {
        self.embed(model, inputs).await
    }
}

//! Shared test doubles for pipeline tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use riskcast_core::error::ProviderError;
use riskcast_core::provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, RawCompletion, StreamChunk, StreamReceiver,
};
use riskcast_providers::{ModelCaller, RetryPolicy};
use riskcast_retrieval::DocumentStore;

/// A gateway double. Each model answers from its own script; once a script
/// runs out the model answers `"{model} says ok"`. Every request is kept for
/// inspection.
pub struct MockGateway {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, ProviderError>>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    /// Embedding calls left to fail
    embed_failures: Mutex<usize>,
    embed_calls: Mutex<usize>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            embed_failures: Mutex::new(0),
            embed_calls: Mutex::new(0),
        }
    }

    pub fn script(self, model: &str, replies: Vec<Result<String, ProviderError>>) -> Self {
        self.scripts.lock().unwrap().insert(model.into(), replies.into());
        self
    }

    /// Fail the next `n` embedding calls with a network error.
    pub fn fail_embeddings(self, n: usize) -> Self {
        *self.embed_failures.lock().unwrap() = n;
        self
    }

    pub fn embed_calls(&self) -> usize {
        *self.embed_calls.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_for(&self, model: &str) -> usize {
        self.requests().iter().filter(|r| r.model == model).count()
    }

    fn next_reply(&self, model: &str) -> Result<String, ProviderError> {
        self.scripts
            .lock()
            .unwrap()
            .get_mut(model)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(format!("{model} says ok")))
    }
}

/// Letter-frequency embedding: texts sharing letters land close together.
pub fn letter_embedding(text: &str) -> Vec<f32> {
    let mut v = vec![0.0; 26];
    for c in text.to_lowercase().chars().filter(char::is_ascii_lowercase) {
        v[(c as u8 - b'a') as usize] += 1.0;
    }
    v
}

#[async_trait::async_trait]
impl Provider for MockGateway {
    fn name(&self) -> &str {
        "mock_gateway"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<RawCompletion, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        let text = self.next_reply(&model)?;
        Ok(RawCompletion(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": text}}]
        })))
    }

    async fn stream(&self, request: ProviderRequest) -> Result<StreamReceiver, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        let text = self.next_reply(&model)?;

        let (tx, rx) = tokio::sync::mpsc::channel(16);
        tokio::spawn(async move {
            for word in text.split_inclusive(' ') {
                let chunk = StreamChunk {
                    content: Some(word.to_string()),
                    done: false,
                };
                if tx.send(Ok(chunk)).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(Ok(StreamChunk { content: None, done: true })).await;
        });
        Ok(rx)
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        *self.embed_calls.lock().unwrap() += 1;
        {
            let mut failures = self.embed_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(ProviderError::Network("transient".into()));
            }
        }
        Ok(EmbeddingResponse {
            embeddings: request.inputs.iter().map(|t| letter_embedding(t)).collect(),
            model: request.model,
        })
    }
}

/// Caller without backoff so failing scripts don't slow tests down.
pub fn caller(gateway: Arc<MockGateway>) -> Arc<ModelCaller> {
    Arc::new(ModelCaller::new(gateway).with_policy(RetryPolicy::none()))
}

pub fn sample_store() -> Arc<DocumentStore> {
    Arc::new(
        DocumentStore::from_json(
            r#"{"projects": [{"id": "p1", "name": "Bridge", "milestones": [
                {"date": "2024-01", "title": "Start", "notes": "kickoff"},
                {"date": "2024-02", "title": "Delay", "notes": "rain"}
            ]}]}"#,
        )
        .unwrap(),
    )
}

//! Single-model chat, optionally grounded in a project's milestones, and a
//! two-model comparison over the same grounded prompt.

use std::sync::Arc;

use riskcast_core::error::Result;
use riskcast_core::log::{LogEvent, LogSink};
use riskcast_core::message::Message;
use riskcast_providers::ModelCaller;
use riskcast_retrieval::DocumentStore;
use serde::Serialize;
use tracing::info;

use crate::evaluator::{ModelMap, ModelResponse};
use crate::prompts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryReply {
    pub model: String,
    pub response: String,
    pub latency_ms: u64,
    /// Whether project context was added to the prompt
    pub grounding: bool,
    pub context_snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareReply {
    pub prompt: String,
    pub project_id: Option<String>,
    pub responses: ModelMap<ModelResponse>,
    pub context_snippet: String,
}

pub struct GroundedChat {
    store: Arc<DocumentStore>,
    caller: Arc<ModelCaller>,
    sink: Arc<dyn LogSink>,
    top_k: usize,
}

impl GroundedChat {
    pub fn new(store: Arc<DocumentStore>, caller: Arc<ModelCaller>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            store,
            caller,
            sink,
            top_k: 3,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Top milestones for the project joined by blank lines, or empty
    /// without a project.
    pub fn context_snippet(&self, project_id: Option<&str>, prompt: &str) -> String {
        match project_id {
            Some(id) => self
                .store
                .retrieve(id, prompt, self.top_k)
                .iter()
                .map(|d| d.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
            None => String::new(),
        }
    }

    fn messages(project_id: Option<&str>, snippet: &str, prompt: &str) -> Vec<Message> {
        let user = if project_id.is_some() {
            prompts::grounded_question(snippet, prompt)
        } else {
            prompt.to_string()
        };
        vec![Message::system(prompts::ANALYST_SYSTEM), Message::user(user)]
    }

    /// Ask one model. Exhausted retries surface as an error.
    pub async fn query(&self, model: &str, prompt: &str, project_id: Option<&str>) -> Result<QueryReply> {
        let snippet = self.context_snippet(project_id, prompt);
        let result = self.caller.call(model, Self::messages(project_id, &snippet, prompt)).await;

        self.sink.record(
            &LogEvent::new("/query", "chat", prompt)
                .model(model)
                .response_len(result.content.len())
                .latency_ms(result.latency_ms)
                .error(result.error.clone()),
        );

        let latency_ms = result.latency_ms;
        let response = result.into_result()?;
        info!(model, grounded = project_id.is_some(), latency_ms, "Query answered");

        Ok(QueryReply {
            model: model.to_string(),
            response,
            latency_ms,
            grounding: project_id.is_some(),
            context_snippet: snippet,
        })
    }

    /// Ask both models the same grounded prompt, one after the other.
    /// Per-model failures stay in their entry.
    pub async fn compare(&self, model_a: &str, model_b: &str, prompt: &str, project_id: Option<&str>) -> CompareReply {
        let snippet = self.context_snippet(project_id, prompt);
        let messages = Self::messages(project_id, &snippet, prompt);

        let mut responses = Vec::with_capacity(2);
        for model in [model_a, model_b] {
            let result = self.caller.call(model, messages.clone()).await;
            self.sink.record(
                &LogEvent::new("/eval", "compare", prompt)
                    .model(model)
                    .response_len(result.content.len())
                    .latency_ms(result.latency_ms)
                    .error(result.error.clone()),
            );
            responses.push((model.to_string(), ModelResponse::from(result)));
        }

        CompareReply {
            prompt: prompt.to_string(),
            project_id: project_id.map(str::to_string),
            responses: responses.into(),
            context_snippet: snippet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{caller, sample_store, MockGateway};
    use riskcast_core::error::{Error, ProviderError};
    use riskcast_telemetry::MemoryLogSink;

    fn chat(gateway: Arc<MockGateway>, sink: Arc<MemoryLogSink>) -> GroundedChat {
        GroundedChat::new(sample_store(), caller(gateway), sink)
    }

    #[tokio::test]
    async fn grounded_query_adds_project_context() {
        let gateway = Arc::new(MockGateway::new().script("m", vec![Ok("answer".into())]));
        let sink = Arc::new(MemoryLogSink::new());

        let reply = chat(gateway.clone(), sink.clone())
            .query("m", "why the delay", Some("p1"))
            .await
            .unwrap();

        assert!(reply.grounding);
        assert_eq!(reply.response, "answer");
        assert_eq!(reply.context_snippet, "2024-02: Delay - rain\n\n2024-01: Start - kickoff");
        let user = &gateway.requests()[0].messages[1].content;
        assert_eq!(
            user,
            "Project context:\n2024-02: Delay - rain\n\n2024-01: Start - kickoff\n\nUser question:\nwhy the delay"
        );

        let events = sink.events();
        assert_eq!(events[0].endpoint, "/query");
        assert_eq!(events[0].response_len, "answer".len());
    }

    #[tokio::test]
    async fn plain_query_sends_prompt_as_is() {
        let gateway = Arc::new(MockGateway::new());
        let reply = chat(gateway.clone(), Arc::new(MemoryLogSink::new()))
            .query("m", "hello", None)
            .await
            .unwrap();
        assert!(!reply.grounding);
        assert!(reply.context_snippet.is_empty());
        assert_eq!(gateway.requests()[0].messages[1].content, "hello");
        assert_eq!(gateway.requests()[0].messages[0].content, prompts::ANALYST_SYSTEM);
    }

    #[tokio::test]
    async fn failed_query_is_an_error_and_still_logged() {
        let gateway = Arc::new(MockGateway::new().script("m", vec![Err(ProviderError::Network("down".into()))]));
        let sink = Arc::new(MemoryLogSink::new());

        let err = chat(gateway, sink.clone()).query("m", "hello", None).await.unwrap_err();
        assert!(matches!(err, Error::Provider(ProviderError::CallFailed(_))));
        assert!(sink.events()[0].error.is_some());
    }

    #[tokio::test]
    async fn compare_asks_both_models() {
        let gateway = Arc::new(MockGateway::new().script("b", vec![Err(ProviderError::Network("down".into()))]));
        let sink = Arc::new(MemoryLogSink::new());

        let reply = chat(gateway.clone(), sink.clone())
            .compare("a", "b", "status?", Some("p1"))
            .await;

        assert_eq!(reply.responses.len(), 2);
        assert_eq!(reply.responses.models(), vec!["a", "b"]);
        assert_eq!(reply.responses.get("a").unwrap().text, "a says ok");
        assert!(reply.responses.get("b").unwrap().error.is_some());
        assert_eq!(gateway.requests()[0].messages, gateway.requests()[1].messages);
        assert_eq!(sink.len(), 2);
    }
}

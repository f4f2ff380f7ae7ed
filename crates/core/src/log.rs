//! Pipeline log events and the sink they are written to.
//!
//! Every stage of a request (planner, retriever, forecaster, one event per
//! evaluated model, the orchestrator itself) emits a [`LogEvent`]. Sinks are
//! injected into the components that emit, so there is no process-wide log
//! handle: the binary opens its sink at startup and drops it at shutdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record in the append-only request log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    /// Entry point that handled the request ("/ask", "/query", "/agent", ...)
    pub endpoint: String,
    /// Pipeline stage ("planner", "retriever", "evaluator", ...)
    pub agent: String,
    /// Model ids involved, comma separated; empty for model-free stages
    pub model: String,
    /// Prompt with newlines flattened to spaces
    pub prompt: String,
    pub response_len: usize,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEvent {
    pub fn new(endpoint: impl Into<String>, agent: impl Into<String>, prompt: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            endpoint: endpoint.into(),
            agent: agent.into(),
            model: String::new(),
            prompt: prompt.replace('\n', " "),
            response_len: 0,
            latency_ms: 0,
            error: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn response_len(mut self, len: usize) -> Self {
        self.response_len = len;
        self
    }

    pub fn latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

/// Where log events go. Implementations must be cheap to call per event.
pub trait LogSink: Send + Sync {
    fn record(&self, event: &LogEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flattens_prompt_newlines() {
        let event = LogEvent::new("/ask", "planner", "line one\nline two")
            .model("a,b")
            .response_len(12)
            .latency_ms(40);
        assert_eq!(event.prompt, "line one line two");
        assert_eq!(event.model, "a,b");
        assert_eq!(event.response_len, 12);
        assert_eq!(event.latency_ms, 40);
        assert!(event.error.is_none());
    }

    #[test]
    fn error_is_omitted_when_absent() {
        let json = serde_json::to_value(LogEvent::new("/ask", "retriever", "q")).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["agent"], "retriever");
    }
}

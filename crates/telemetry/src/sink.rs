//! [`LogSink`] implementations.

use std::sync::{Arc, RwLock};

use riskcast_core::log::{LogEvent, LogSink};
use tracing::{info, warn};

/// Emits every event as a structured `tracing` record under the
/// `riskcast::pipeline` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn record(&self, event: &LogEvent) {
        match &event.error {
            None => info!(
                target: "riskcast::pipeline",
                endpoint = %event.endpoint,
                agent = %event.agent,
                model = %event.model,
                prompt = %event.prompt,
                response_len = event.response_len,
                latency_ms = event.latency_ms,
                "stage complete"
            ),
            Some(error) => warn!(
                target: "riskcast::pipeline",
                endpoint = %event.endpoint,
                agent = %event.agent,
                model = %event.model,
                prompt = %event.prompt,
                latency_ms = event.latency_ms,
                error = %error,
                "stage failed"
            ),
        }
    }
}

/// Append-only in-memory record of events.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    events: RwLock<Vec<LogEvent>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far, oldest first.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemoryLogSink {
    fn record(&self, event: &LogEvent) {
        // A poisoned lock only means another writer panicked mid-push
        match self.events.write() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

/// Forwards each event to every inner sink in order.
#[derive(Default, Clone)]
pub struct FanoutLogSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanoutLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LogSink for FanoutLogSink {
    fn record(&self, event: &LogEvent) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(agent: &str) -> LogEvent {
        LogEvent::new("/ask", agent, "will it slip?").latency_ms(12)
    }

    #[test]
    fn memory_sink_keeps_order() {
        let sink = MemoryLogSink::new();
        sink.record(&event("planner"));
        sink.record(&event("retriever"));
        let agents: Vec<String> = sink.events().into_iter().map(|e| e.agent).collect();
        assert_eq!(agents, vec!["planner", "retriever"]);
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let a = Arc::new(MemoryLogSink::new());
        let b = Arc::new(MemoryLogSink::new());
        let fanout = FanoutLogSink::new()
            .with(a.clone())
            .with(b.clone())
            .with(Arc::new(TracingLogSink));
        assert_eq!(fanout.len(), 3);

        fanout.record(&event("planner"));
        fanout.record(&event("forecaster").error(Some("timeout".into())));
        assert_eq!(a.len(), 2);
        assert_eq!(b.events()[1].error.as_deref(), Some("timeout"));
    }

    #[test]
    fn empty_fanout_is_a_no_op() {
        let fanout = FanoutLogSink::new();
        assert!(fanout.is_empty());
        fanout.record(&event("planner"));
    }
}

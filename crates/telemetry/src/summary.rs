//! Per-stage latency and error summary over recorded events.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use riskcast_core::log::LogEvent;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageStats {
    pub calls: u64,
    pub errors: u64,
    pub total_latency_ms: u64,
    pub max_latency_ms: u64,
}

impl StageStats {
    pub fn mean_latency_ms(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.calls as f64
        }
    }
}

/// Stats keyed by `agent`, in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogSummary {
    pub stages: BTreeMap<String, StageStats>,
    /// Earliest event timestamp
    pub from: Option<DateTime<Utc>>,
    /// Latest event timestamp
    pub to: Option<DateTime<Utc>>,
}

impl LogSummary {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a LogEvent>) -> Self {
        let mut summary = Self::default();
        for event in events {
            summary.add(event);
        }
        summary
    }

    pub fn add(&mut self, event: &LogEvent) {
        let stats = self.stages.entry(event.agent.clone()).or_default();
        stats.calls += 1;
        if event.error.is_some() {
            stats.errors += 1;
        }
        stats.total_latency_ms += event.latency_ms;
        stats.max_latency_ms = stats.max_latency_ms.max(event.latency_ms);

        self.from = Some(self.from.map_or(event.timestamp, |t| t.min(event.timestamp)));
        self.to = Some(self.to.map_or(event.timestamp, |t| t.max(event.timestamp)));
    }

    pub fn total_errors(&self) -> u64 {
        self.stages.values().map(|s| s.errors).sum()
    }
}

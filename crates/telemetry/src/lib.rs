//! Pipeline telemetry for riskcast.
//!
//! Log sinks that receive the per-stage [`LogEvent`]s emitted by the agent
//! pipeline (tracing, in-memory, JSON-lines file, fan-out), and a summary
//! that folds recorded events into per-stage latency and error counts.
//!
//! [`LogEvent`]: riskcast_core::LogEvent

pub mod jsonl;
pub mod sink;
pub mod summary;

pub use jsonl::{read_events, JsonlLogSink};
pub use sink::{FanoutLogSink, MemoryLogSink, TracingLogSink};
pub use summary::{LogSummary, StageStats};

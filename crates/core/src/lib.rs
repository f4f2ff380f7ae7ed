//! # riskcast core
//!
//! Domain types, traits, and error definitions shared by every riskcast
//! crate. Subsystems are defined here as traits and implemented elsewhere:
//!
//! - [`Provider`]: the hosted completion / embedding gateway
//! - [`Embedder`]: text to vectors, as the document index sees it
//! - [`Tool`]: a capability the tool agent can invoke
//! - [`LogSink`]: the append-only record of pipeline stages
//!
//! Keeping the traits here lets tests swap in scripted providers and
//! in-memory sinks without touching the pipeline code.

pub mod error;
pub mod log;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use log::{LogEvent, LogSink};
pub use message::{Message, Role};
pub use provider::{Embedder, Provider, ProviderRequest, RawCompletion, StreamChunk};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};

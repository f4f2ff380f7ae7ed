//! Model access for riskcast.
//!
//! [`OpenAiCompatProvider`] talks to the OpenAI-compatible gateway.
//! [`ModelCaller`] layers the retry policy, per-attempt timeout and text
//! extraction on top of any `riskcast_core::Provider`.

pub mod caller;
pub mod extract;
pub mod openai_compat;
pub mod retry;

pub use caller::{CallResult, ModelCaller};
pub use extract::{extract_text, CompletionShape};
pub use openai_compat::OpenAiCompatProvider;
pub use retry::{Backoff, RetryPolicy};

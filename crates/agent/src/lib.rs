//! The riskcast agent pipeline.
//!
//! The `/ask` flow is a fixed sequence of stages:
//!
//! 1. **Plan**: route the prompt by keyword (risk forecast, lookup, general)
//! 2. **Retrieve**: rank the project's milestones against the prompt
//! 3. **Forecast**: one model call over the milestones, for risk prompts
//! 4. **Evaluate**: ask two models, score both answers, pick a winner
//!
//! Alongside it sit grounded single-model chat, a tool agent, question
//! answering over an uploaded document and a judge-graded eval harness. Every entry point takes its
//! collaborators (document store, model caller, log sink) by `Arc` and keeps
//! no state between requests.

pub mod chat;
pub mod document_qa;
pub mod evals;
pub mod evaluator;
pub mod forecaster;
pub mod orchestrator;
pub mod planner;
pub mod prompts;
pub mod tool_agent;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use chat::{CompareReply, GroundedChat, QueryReply};
pub use document_qa::{DocumentAnswer, DocumentSession};
pub use evals::{default_cases, EvalCase, EvalHarness, EvalRecord};
pub use evaluator::{score_response, EvaluationResult, Evaluator, ModelMap, ModelResponse};
pub use forecaster::{Forecast, Forecaster};
pub use orchestrator::{AskRequest, AskResponse, Orchestrator};
pub use planner::{plan, PlanAction, PlanDecision};
pub use tool_agent::{AgentReply, ToolAgent, ToolOutput};

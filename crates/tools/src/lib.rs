//! Built-in tools for the riskcast agent.
//!
//! - `calculator`: constrained arithmetic
//! - `project_lookup`: milestone retrieval from the project store
//! - `number_fact`: math trivia for an integer over HTTP, opt-in

pub mod calculator;
pub mod number_fact;
pub mod project_lookup;

use std::sync::Arc;

use riskcast_core::tool::ToolRegistry;
use riskcast_retrieval::DocumentStore;

pub use calculator::{evaluate, filter_expression, format_number, CalcError, CalculatorTool};
pub use number_fact::{first_integer, NumberFactTool, DEFAULT_NUMBER_FACT_URL, NUMBER_FACT_UNAVAILABLE};
pub use project_lookup::ProjectLookupTool;

/// The offline tools: calculator and project lookup. Register a
/// [`NumberFactTool`] on top to enable number facts.
pub fn default_registry(store: Arc<DocumentStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CalculatorTool));
    registry.register(Box::new(ProjectLookupTool::new(store)));
    registry
}

//! Keyword router deciding which pipeline stages a prompt needs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    RiskForecast,
    Lookup,
    General,
}

impl PlanAction {
    /// Whether milestones should be retrieved (given a project id).
    pub fn needs_retrieval(self) -> bool {
        matches!(self, PlanAction::RiskForecast | PlanAction::Lookup)
    }

    pub fn needs_forecast(self) -> bool {
        self == PlanAction::RiskForecast
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanDecision {
    pub action: PlanAction,
    pub confidence: f32,
}

/// Classify `prompt`. Rules are checked in order and the first match wins:
/// "risk"/"delay" → risk forecast, "what"/"list" → lookup, else general.
/// Matching is case-insensitive substring search.
pub fn plan(prompt: &str) -> PlanDecision {
    let lower = prompt.to_lowercase();
    let (action, confidence) = if lower.contains("risk") || lower.contains("delay") {
        (PlanAction::RiskForecast, 0.8)
    } else if lower.contains("what") || lower.contains("list") {
        (PlanAction::Lookup, 0.6)
    } else {
        (PlanAction::General, 0.5)
    };
    PlanDecision { action, confidence }
}

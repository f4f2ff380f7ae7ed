//! Side-by-side evaluation of two models with a keyword heuristic.
//!
//! Both models get the same analyst prompt over the same context. Each
//! answer is scored on whether it talks about delays, durations in weeks and
//! confidence, with a bonus for reasonable length. The highest score wins;
//! ties go to the model evaluated first.

use std::sync::Arc;

use riskcast_core::message::Message;
use riskcast_providers::{CallResult, ModelCaller};
use riskcast_retrieval::ScoredDoc;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use tracing::info;

use crate::forecaster::join_docs;
use crate::prompts;

/// Heuristic quality score in `[0, 1]`. Empty text scores 0.
pub fn score_response(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let lower = text.to_lowercase();
    let mut score = 0.0;

    // "delayed" and "weeks" contain "delay" and "week"
    if lower.contains("delay") {
        score += 0.4;
    }
    if lower.contains("week") {
        score += 0.3;
    }
    if lower.contains("confidence") || lower.contains('%') {
        score += 0.2;
    }

    let words = text.split_whitespace().count();
    if (30..=300).contains(&words) {
        score += 0.2;
    } else if words < 30 {
        score += 0.1;
    }

    f64::min(score, 1.0)
}

/// One model's answer as seen by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct ModelResponse {
    pub text: String,
    pub latency_ms: u64,
    pub error: Option<String>,
}

impl From<CallResult> for ModelResponse {
    fn from(result: CallResult) -> Self {
        Self {
            text: result.content,
            latency_ms: result.latency_ms,
            error: result.error,
        }
    }
}

/// Per-model values in evaluation order. Serializes as a JSON object whose
/// keys keep that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMap<V>(Vec<(String, V)>);

impl<V> ModelMap<V> {
    pub fn get(&self, model: &str) -> Option<&V> {
        self.0.iter().find(|(m, _)| m == model).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(m, v)| (m.as_str(), v))
    }

    pub fn models(&self) -> Vec<&str> {
        self.0.iter().map(|(m, _)| m.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> From<Vec<(String, V)>> for ModelMap<V> {
    fn from(entries: Vec<(String, V)>) -> Self {
        Self(entries)
    }
}

impl<V: Serialize> Serialize for ModelMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (model, value) in &self.0 {
            map.serialize_entry(model, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EvaluationResult {
    pub responses: ModelMap<ModelResponse>,
    pub scores: ModelMap<f64>,
    pub winner: String,
}

pub struct Evaluator {
    caller: Arc<ModelCaller>,
}

impl Evaluator {
    pub fn new(caller: Arc<ModelCaller>) -> Self {
        Self { caller }
    }

    /// Ask both models, score their answers and pick a winner. A model that
    /// fails keeps its error in `responses` and scores 0. When both ids are
    /// the same the model is asked once.
    pub async fn evaluate(&self, query: &str, docs: &[ScoredDoc], model_a: &str, model_b: &str) -> EvaluationResult {
        let user = prompts::context_question(&join_docs(docs), query);
        let models: Vec<&str> = if model_a == model_b {
            vec![model_a]
        } else {
            vec![model_a, model_b]
        };

        let mut responses = Vec::with_capacity(models.len());
        for model in &models {
            let messages = vec![Message::system(prompts::ANALYST_SYSTEM), Message::user(user.clone())];
            let result = self.caller.call(model, messages).await;
            responses.push((model.to_string(), ModelResponse::from(result)));
        }

        let scores: Vec<(String, f64)> = responses
            .iter()
            .map(|(model, r)| (model.clone(), score_response(&r.text)))
            .collect();

        // Strictly greater replaces, so the first model keeps ties
        let mut winner = &scores[0];
        for candidate in &scores[1..] {
            if candidate.1 > winner.1 {
                winner = candidate;
            }
        }
        let winner = winner.0.clone();

        info!(winner = %winner, models = models.len(), "Evaluation complete");
        EvaluationResult {
            responses: ModelMap(responses),
            scores: ModelMap(scores),
            winner,
        }
    }
}

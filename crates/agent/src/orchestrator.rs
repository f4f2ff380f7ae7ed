//! The `/ask` pipeline: planner → retriever → forecaster → evaluator.
//!
//! Stages run one after another within a request. Every stage reports a
//! [`LogEvent`] to the injected sink, and a final `orchestrator` event carries
//! the total wall-clock latency.

use std::sync::Arc;

use riskcast_core::error::Result;
use riskcast_core::log::{LogEvent, LogSink};
use riskcast_providers::ModelCaller;
use riskcast_retrieval::{DocumentStore, ScoredDoc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::evaluator::{EvaluationResult, Evaluator};
use crate::forecaster::{Forecast, Forecaster};
use crate::planner::{plan, PlanDecision};

const ENDPOINT: &str = "/ask";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub model_a: String,
    pub model_b: String,
    pub prompt: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskResponse {
    pub plan: PlanDecision,
    pub docs: Vec<ScoredDoc>,
    pub forecast: Option<Forecast>,
    pub evaluation: EvaluationResult,
    pub latency_ms: u64,
}

pub struct Orchestrator {
    store: Arc<DocumentStore>,
    forecaster: Forecaster,
    evaluator: Evaluator,
    sink: Arc<dyn LogSink>,
    top_k: usize,
}

impl Orchestrator {
    pub fn new(store: Arc<DocumentStore>, caller: Arc<ModelCaller>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            store,
            forecaster: Forecaster::new(caller.clone()),
            evaluator: Evaluator::new(caller),
            sink,
            top_k: 3,
        }
    }

    /// Milestones retrieved per request.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        let start = Instant::now();
        let prompt = request.prompt.as_str();
        let models = format!("{},{}", request.model_a, request.model_b);

        let decision = plan(prompt);
        debug!(action = ?decision.action, confidence = decision.confidence, "Planned request");
        let plan_json = serde_json::to_string(&decision)?;
        self.sink.record(
            &LogEvent::new(ENDPOINT, "planner", prompt)
                .model(&models)
                .response_len(plan_json.len()),
        );

        let docs = match &request.project_id {
            Some(project_id) if decision.action.needs_retrieval() => {
                let stage = Instant::now();
                let docs = self.store.retrieve(project_id, prompt, self.top_k);
                let docs_json = serde_json::to_string(&docs)?;
                self.sink.record(
                    &LogEvent::new(ENDPOINT, "retriever", prompt)
                        .response_len(docs_json.len())
                        .latency_ms(stage.elapsed().as_millis() as u64),
                );
                docs
            }
            _ => Vec::new(),
        };

        let forecast = if decision.action.needs_forecast() {
            let stage = Instant::now();
            let outcome = self.forecaster.forecast(&docs, prompt, &request.model_a).await;
            let event = LogEvent::new(ENDPOINT, "forecaster", prompt)
                .model(&request.model_a)
                .latency_ms(stage.elapsed().as_millis() as u64);
            match outcome {
                Ok(forecast) => {
                    self.sink.record(&event.response_len(forecast.text.len()));
                    Some(forecast)
                }
                Err(e) => {
                    self.sink.record(&event.error(Some(e.to_string())));
                    return Err(e.into());
                }
            }
        } else {
            None
        };

        let evaluation = self
            .evaluator
            .evaluate(prompt, &docs, &request.model_a, &request.model_b)
            .await;
        for (model, response) in evaluation.responses.iter() {
            self.sink.record(
                &LogEvent::new(ENDPOINT, "evaluator", prompt)
                    .model(model)
                    .response_len(response.text.len())
                    .latency_ms(response.latency_ms)
                    .error(response.error.clone()),
            );
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        self.sink.record(
            &LogEvent::new(ENDPOINT, "orchestrator", prompt)
                .model(&models)
                .response_len("completed".len())
                .latency_ms(latency_ms),
        );
        info!(
            action = ?decision.action,
            docs = docs.len(),
            forecast = forecast.is_some(),
            winner = %evaluation.winner,
            latency_ms,
            "Ask pipeline complete"
        );

        Ok(AskResponse {
            plan: decision,
            docs,
            forecast,
            evaluation,
            latency_ms,
        })
    }
}

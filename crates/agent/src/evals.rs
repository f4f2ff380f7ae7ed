//! Offline evaluation: run fixed cases through each model and have a judge
//! model grade every answer for correctness.
//!
//! A failing case never stops the run. Its record carries the error and the
//! remaining cases still go out.

use std::sync::Arc;

use riskcast_core::log::{LogEvent, LogSink};
use riskcast_core::message::Message;
use riskcast_providers::{CallResult, ModelCaller};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::prompts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalCase {
    pub input: String,
    pub expected: String,
}

impl EvalCase {
    pub fn new(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected: expected.into(),
        }
    }
}

/// The built-in cases.
pub fn default_cases() -> Vec<EvalCase> {
    vec![
        EvalCase::new("What is 2+2?", "4"),
        EvalCase::new("Summarize: The Eiffel Tower is in Paris", "Eiffel Tower is in Paris"),
    ]
}

/// One case against one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalRecord {
    pub model: String,
    pub input: String,
    pub expected: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// The judge's verdict: a 0-1 score or a short comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvalRecord {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub struct EvalHarness {
    caller: Arc<ModelCaller>,
    judge_model: String,
    sink: Arc<dyn LogSink>,
}

impl EvalHarness {
    pub fn new(caller: Arc<ModelCaller>, judge_model: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            caller,
            judge_model: judge_model.into(),
            sink,
        }
    }

    fn record(&self, agent: &str, model: &str, prompt: &str, result: &CallResult) {
        self.sink.record(
            &LogEvent::new("/evals", agent, prompt)
                .model(model)
                .response_len(result.content.len())
                .latency_ms(result.latency_ms)
                .error(result.error.clone()),
        );
    }

    /// Every case against every model, case-major, one call at a time.
    pub async fn run(&self, cases: &[EvalCase], models: &[String]) -> Vec<EvalRecord> {
        let mut records = Vec::with_capacity(cases.len() * models.len());
        for case in cases {
            for model in models {
                records.push(self.run_case(case, model).await);
            }
        }

        let failed = records.iter().filter(|r| !r.is_ok()).count();
        info!(cases = cases.len(), models = models.len(), failed, "Evals finished");
        records
    }

    async fn run_case(&self, case: &EvalCase, model: &str) -> EvalRecord {
        let mut record = EvalRecord {
            model: model.to_string(),
            input: case.input.clone(),
            expected: case.expected.clone(),
            output: None,
            score: None,
            error: None,
        };

        let answer = self.caller.call(model, vec![Message::user(&case.input)]).await;
        self.record("evals", model, &case.input, &answer);
        let output = match answer.into_result() {
            Ok(output) => output,
            Err(e) => {
                warn!(model, input = %case.input, error = %e, "Eval case failed");
                record.error = Some(e.to_string());
                return record;
            }
        };

        let prompt = prompts::judge(prompts::EVAL_CRITERION, &case.input, &output);
        let verdict = self.caller.call(&self.judge_model, vec![Message::user(prompt)]).await;
        self.record("judge", &self.judge_model, &case.input, &verdict);
        record.output = Some(output);
        match verdict.into_result() {
            Ok(score) => record.score = Some(score.trim().to_string()),
            Err(e) => {
                warn!(model, judge = %self.judge_model, error = %e, "Eval grading failed");
                record.error = Some(format!("judge: {e}"));
            }
        }
        record
    }
}

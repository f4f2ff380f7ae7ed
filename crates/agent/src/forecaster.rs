//! Risk forecaster: one completion over the retrieved milestones.

use std::sync::Arc;

use riskcast_core::error::ProviderError;
use riskcast_core::message::Message;
use riskcast_providers::ModelCaller;
use riskcast_retrieval::ScoredDoc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::prompts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub model: String,
    pub text: String,
}

/// Milestone texts joined one per line.
pub fn join_docs(docs: &[ScoredDoc]) -> String {
    docs.iter().map(|d| d.text.as_str()).collect::<Vec<_>>().join("\n")
}

pub struct Forecaster {
    caller: Arc<ModelCaller>,
}

impl Forecaster {
    pub fn new(caller: Arc<ModelCaller>) -> Self {
        Self { caller }
    }

    /// Forecast risks for `query` from `docs`. A failed call is returned, not
    /// retried.
    pub async fn forecast(&self, docs: &[ScoredDoc], query: &str, model: &str) -> Result<Forecast, ProviderError> {
        let messages = vec![
            Message::system(prompts::FORECASTER_SYSTEM),
            Message::user(prompts::context_question(&join_docs(docs), query)),
        ];
        let text = self.caller.complete_once(model, messages).await?;
        info!(model, docs = docs.len(), chars = text.len(), "Forecast produced");
        Ok(Forecast {
            model: model.to_string(),
            text,
        })
    }
}

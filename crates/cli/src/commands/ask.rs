//! `riskcast ask`: the full plan → retrieve → forecast → evaluate pipeline.

use std::path::Path;

use riskcast_agent::{AskRequest, Orchestrator};
use riskcast_telemetry::LogSummary;

use crate::app::{print_json, App, CliResult};

pub async fn run(
    config_path: Option<&Path>,
    prompt: String,
    project_id: Option<String>,
    model_a: Option<String>,
    model_b: Option<String>,
    stats: bool,
) -> CliResult {
    let app = App::load(config_path)?;
    let request = AskRequest {
        model_a: model_a.unwrap_or_else(|| app.config.models.model_a.clone()),
        model_b: model_b.unwrap_or_else(|| app.config.models.model_b.clone()),
        prompt,
        project_id,
    };

    let orchestrator = Orchestrator::new(app.store.clone(), app.caller.clone(), app.sink.clone())
        .with_top_k(app.config.retrieval.top_k);
    let outcome = orchestrator.ask(&request).await;

    if stats {
        print_stats(&LogSummary::from_events(&app.events.events()));
    }

    print_json(&outcome?)
}

fn print_stats(summary: &LogSummary) {
    eprintln!("  {:<14} {:>5} {:>6} {:>10} {:>9}", "stage", "calls", "errors", "mean (ms)", "max (ms)");
    for (stage, stats) in &summary.stages {
        eprintln!(
            "  {:<14} {:>5} {:>6} {:>10.1} {:>9}",
            stage,
            stats.calls,
            stats.errors,
            stats.mean_latency_ms(),
            stats.max_latency_ms
        );
    }
}

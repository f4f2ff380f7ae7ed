//! `riskcast query` and `riskcast compare`: grounded chat with one or two
//! models.

use std::path::Path;

use riskcast_agent::GroundedChat;

use crate::app::{print_json, App, CliResult};

pub async fn run(
    config_path: Option<&Path>,
    prompt: String,
    project_id: Option<String>,
    model: Option<String>,
) -> CliResult {
    let app = App::load(config_path)?;
    let model = app.model(model);
    let chat = GroundedChat::new(app.store.clone(), app.caller.clone(), app.sink.clone())
        .with_top_k(app.config.retrieval.top_k);

    let reply = chat.query(&model, &prompt, project_id.as_deref()).await?;
    print_json(&reply)
}

pub async fn compare(
    config_path: Option<&Path>,
    prompt: String,
    project_id: Option<String>,
    model_a: Option<String>,
    model_b: Option<String>,
) -> CliResult {
    let app = App::load(config_path)?;
    let model_a = model_a.unwrap_or_else(|| app.config.models.model_a.clone());
    let model_b = model_b.unwrap_or_else(|| app.config.models.model_b.clone());
    let chat = GroundedChat::new(app.store.clone(), app.caller.clone(), app.sink.clone())
        .with_top_k(app.config.retrieval.top_k);

    let reply = chat.compare(&model_a, &model_b, &prompt, project_id.as_deref()).await;
    print_json(&reply)
}

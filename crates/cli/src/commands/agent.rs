//! `riskcast agent`: answer a task with tool outputs in view.

use std::path::Path;
use std::sync::Arc;

use riskcast_agent::ToolAgent;

use crate::app::{print_json, App, CliResult};

pub async fn run(
    config_path: Option<&Path>,
    task: String,
    project_id: Option<String>,
    model: Option<String>,
) -> CliResult {
    let app = App::load(config_path)?;
    let model = app.model(model);
    let tools = Arc::new(app.tools()?);

    let agent = ToolAgent::new(tools, app.caller.clone(), app.sink.clone()).with_top_k(app.config.retrieval.top_k);
    let reply = agent.run(&model, &task, project_id.as_deref()).await?;
    print_json(&reply)
}

//! Model-free commands: `retrieve`, `plan`, `projects` and `tools`.

use std::path::Path;
use std::sync::Arc;

use riskcast_agent::plan as plan_prompt;
use serde::Serialize;

use crate::app::{load_config, load_store, print_json, tool_registry, CliResult};

pub async fn run(config_path: Option<&Path>, project_id: &str, query: &str, top_k: Option<usize>) -> CliResult {
    let config = load_config(config_path)?;
    let store = load_store(&config.retrieval.projects_path)?;
    if store.get(project_id).is_none() {
        eprintln!("  Unknown project '{project_id}'. Run `riskcast projects` to list them.");
    }

    let docs = store.retrieve(project_id, query, top_k.unwrap_or(config.retrieval.top_k));
    print_json(&docs)
}

pub fn plan(prompt: &str) -> CliResult {
    print_json(&plan_prompt(prompt))
}

#[derive(Serialize)]
struct ProjectRow<'a> {
    id: &'a str,
    name: &'a str,
    milestones: usize,
}

pub async fn projects(config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;
    let store = load_store(&config.retrieval.projects_path)?;

    let rows: Vec<ProjectRow<'_>> = store
        .projects()
        .into_iter()
        .map(|p| ProjectRow {
            id: &p.id,
            name: &p.name,
            milestones: p.milestones.len(),
        })
        .collect();
    print_json(&rows)
}

/// Name, description and argument schema of every tool the agent can use.
pub async fn tools(config_path: Option<&Path>) -> CliResult {
    let config = load_config(config_path)?;
    let store = Arc::new(load_store(&config.retrieval.projects_path)?);
    print_json(&tool_registry(&config, store)?.definitions())
}

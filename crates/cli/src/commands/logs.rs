//! `riskcast logs`: summarize the JSON-lines event log.

use std::path::{Path, PathBuf};

use riskcast_telemetry::{read_events, LogSummary};

use crate::app::{load_config, print_json, CliResult};

pub async fn run(config_path: Option<&Path>, path: Option<PathBuf>, raw: bool) -> CliResult {
    let path = match path {
        Some(path) => path,
        None => load_config(config_path)?
            .logging
            .events_path
            .ok_or("No event log configured (set logging.events_path or pass --path)")?,
    };

    let events = read_events(&path).map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    if raw {
        print_json(&events)
    } else {
        print_json(&LogSummary::from_events(&events))
    }
}

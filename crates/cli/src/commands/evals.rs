//! `riskcast evals`: run the eval cases against one or more models and
//! print every judged record.

use std::path::Path;

use riskcast_agent::{default_cases, EvalCase, EvalHarness};

use crate::app::{print_json, App, CliResult};

/// Cases from a JSON array of `{"input", "expected"}`, or the built-in set.
pub fn load_cases(path: Option<&Path>) -> CliResult<Vec<EvalCase>> {
    let Some(path) = path else {
        return Ok(default_cases());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    let cases: Vec<EvalCase> =
        serde_json::from_str(&text).map_err(|e| format!("Invalid eval cases in {}: {e}", path.display()))?;
    if cases.is_empty() {
        return Err(format!("No eval cases in {}", path.display()).into());
    }
    Ok(cases)
}

pub async fn run(
    config_path: Option<&Path>,
    cases_path: Option<&Path>,
    models: Vec<String>,
    judge: Option<String>,
) -> CliResult {
    let app = App::load(config_path)?;
    let cases = load_cases(cases_path)?;
    let models = if models.is_empty() {
        vec![app.config.models.default_model.clone()]
    } else {
        models
    };
    let judge = judge.unwrap_or_else(|| app.config.models.judge_model.clone());

    let harness = EvalHarness::new(app.caller.clone(), judge, app.sink.clone());
    let records = harness.run(&cases, &models).await;
    print_json(&records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_cases_without_a_file() {
        assert_eq!(load_cases(None).unwrap(), default_cases());
    }

    #[test]
    fn cases_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.json");
        std::fs::write(&path, r#"[{"input": "Crane days lost?", "expected": "3"}]"#).unwrap();

        let cases = load_cases(Some(&path)).unwrap();
        assert_eq!(cases, vec![EvalCase::new("Crane days lost?", "3")]);
    }

    #[test]
    fn empty_or_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(load_cases(Some(&path)).is_err());
        std::fs::write(&path, r#"[{"input": "q"}]"#).unwrap();
        assert!(load_cases(Some(&path)).is_err());
    }
}

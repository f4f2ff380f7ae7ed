//! `riskcast config`: configuration management commands.

use std::path::Path;

use crate::app::{config_path, load_config, CliResult};

pub async fn validate(explicit: Option<&Path>) -> CliResult {
    println!("🔍 Validating configuration...");

    let config = match load_config(explicit) {
        Ok(config) => config,
        Err(e) => {
            println!("   ❌ {e}");
            return Err(e);
        }
    };
    println!("   ✅ Config parsed successfully");

    let mut warnings = Vec::new();
    if config.gateway.api_key.is_none() {
        warnings.push("No gateway API key set (set RISKCAST_API_KEY or LITELLM_API_KEY)".to_string());
    }
    if !config.retrieval.projects_path.exists() {
        warnings.push(format!(
            "Projects file {} does not exist",
            config.retrieval.projects_path.display()
        ));
    }
    if config.models.model_a == config.models.model_b {
        warnings.push("models.model_a and models.model_b are the same; ask will evaluate one model".to_string());
    }
    if config.retry.max_retries == 0 {
        warnings.push("retry.max_retries is 0; failed calls are not retried".to_string());
    }

    if warnings.is_empty() {
        println!("   ✅ All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   ⚠️  {w}");
        }
    }

    println!();
    println!("   Gateway:   {}", config.gateway.base_url);
    println!("   Model:     {}", config.models.default_model);
    println!("   Compare:   {} vs {}", config.models.model_a, config.models.model_b);
    println!("   Embedding: {}", config.models.embedding_model);
    println!("   Judge:     {}", config.models.judge_model);
    println!("   Projects:  {}", config.retrieval.projects_path.display());

    Ok(())
}

pub async fn show(explicit: Option<&Path>) -> CliResult {
    let mut config = load_config(explicit)?;
    if config.gateway.api_key.is_some() {
        config.gateway.api_key = Some("***".into());
    }
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub async fn path(explicit: Option<&Path>) -> CliResult {
    println!("{}", config_path(explicit).display());
    Ok(())
}

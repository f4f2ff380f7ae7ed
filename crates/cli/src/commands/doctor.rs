//! `riskcast doctor`: diagnose configuration and gateway health.

use std::path::Path;

use riskcast_core::provider::Provider;
use riskcast_providers::OpenAiCompatProvider;
use riskcast_retrieval::DocumentStore;

use crate::app::{config_path, load_config, CliResult};

pub async fn run(explicit: Option<&Path>) -> CliResult {
    println!("🩺 riskcast doctor");
    println!("==================\n");

    let mut issues = 0;

    let path = config_path(explicit);
    if path.exists() {
        println!("  ✅ Config file found: {}", path.display());
    } else {
        println!("  ⚠️  No config file, using defaults (run `riskcast onboard`)");
    }

    let config = match load_config(explicit) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ {e}");
            println!("\n  ⚠️  Cannot continue without a valid config.");
            return Ok(());
        }
    };

    if config.gateway.api_key.is_some() {
        println!("  ✅ Gateway API key configured");
    } else {
        println!("  ⚠️  No gateway API key (set RISKCAST_API_KEY or LITELLM_API_KEY)");
        issues += 1;
    }

    let projects_path = &config.retrieval.projects_path;
    if projects_path.exists() {
        match DocumentStore::load(projects_path) {
            Ok(store) => println!("  ✅ {} project(s) in {}", store.len(), projects_path.display()),
            Err(e) => {
                println!("  ❌ Projects file unreadable: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ⚠️  No projects file at {}", projects_path.display());
        issues += 1;
    }

    match OpenAiCompatProvider::from_config(&config.gateway) {
        Ok(provider) => match provider.health_check().await {
            Ok(true) => println!("  ✅ Gateway reachable at {}", provider.base_url()),
            Ok(false) => {
                println!("  ❌ Gateway at {} answered with an error", provider.base_url());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Gateway unreachable: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Gateway client could not be built: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

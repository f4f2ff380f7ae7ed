//! `riskcast onboard`: first-time setup.

use std::path::Path;

use riskcast_config::AppConfig;

use crate::app::{config_path, CliResult};

pub async fn run(explicit: Option<&Path>) -> CliResult {
    let config_path = config_path(explicit);

    println!("riskcast: first-time setup");
    println!("==========================\n");

    if let Some(dir) = config_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Point gateway.base_url at your LiteLLM gateway");
    println!("   2. Set RISKCAST_API_KEY (or gateway.api_key)");
    println!("   3. Point retrieval.projects_path at your projects JSON");
    println!("   4. Run: riskcast doctor\n");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_a_loadable_default_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        run(Some(&path)).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(AppConfig::load_from(&path).is_ok());

        std::fs::write(&path, format!("{written}\n# edited\n")).unwrap();
        run(Some(&path)).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("# edited\n"));
    }
}

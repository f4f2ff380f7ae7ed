//! Shared wiring for commands: config, project store, model caller and the
//! pipeline log sink.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use riskcast_config::AppConfig;
use riskcast_core::log::LogSink;
use riskcast_core::provider::Provider;
use riskcast_core::tool::ToolRegistry;
use riskcast_providers::{ModelCaller, OpenAiCompatProvider};
use riskcast_retrieval::DocumentStore;
use riskcast_telemetry::{FanoutLogSink, JsonlLogSink, MemoryLogSink, TracingLogSink};
use tracing::warn;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Config file to use: the explicit one, else the default location.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

pub fn load_config(explicit: Option<&Path>) -> CliResult<AppConfig> {
    let path = config_path(explicit);
    AppConfig::load_with_env(&path).map_err(|e| format!("Failed to load config: {e}").into())
}

/// Projects from `path`, or an empty store when the file does not exist.
pub fn load_store(path: &Path) -> CliResult<DocumentStore> {
    if !path.exists() {
        warn!(path = %path.display(), "Projects file not found, starting with no projects");
        return Ok(DocumentStore::default());
    }
    Ok(DocumentStore::load(path)?)
}

pub struct App {
    pub config: AppConfig,
    pub store: Arc<DocumentStore>,
    pub caller: Arc<ModelCaller>,
    pub sink: Arc<dyn LogSink>,
    /// Every event this process recorded, for `--stats`
    pub events: Arc<MemoryLogSink>,
}

impl App {
    /// Wire everything against the configured gateway.
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let config = load_config(config_path)?;
        let provider = OpenAiCompatProvider::from_config(&config.gateway)?;
        Self::with_provider(config, Arc::new(provider))
    }

    pub fn with_provider(config: AppConfig, provider: Arc<dyn Provider>) -> CliResult<Self> {
        let store = Arc::new(load_store(&config.retrieval.projects_path)?);
        let caller = Arc::new(ModelCaller::from_config(provider, &config));
        let events = Arc::new(MemoryLogSink::new());
        let mut fanout = FanoutLogSink::new()
            .with(Arc::new(TracingLogSink))
            .with(events.clone());
        if let Some(path) = &config.logging.events_path {
            let file = JsonlLogSink::open(path)
                .map_err(|e| format!("Cannot open event log {}: {e}", path.display()))?;
            fanout = fanout.with(Arc::new(file));
        }
        let sink = Arc::new(fanout);

        Ok(Self {
            config,
            store,
            caller,
            sink,
            events,
        })
    }

    /// Built-in tools, plus number facts when `tools.number_facts` is on.
    pub fn tools(&self) -> CliResult<ToolRegistry> {
        tool_registry(&self.config, self.store.clone())
    }

    /// `explicit`, or the configured default model.
    pub fn model(&self, explicit: Option<String>) -> String {
        explicit.unwrap_or_else(|| self.config.models.default_model.clone())
    }
}

pub fn tool_registry(config: &AppConfig, store: Arc<DocumentStore>) -> CliResult<ToolRegistry> {
    let mut registry = riskcast_tools::default_registry(store);
    if config.tools.number_facts {
        registry.register(Box::new(riskcast_tools::NumberFactTool::new(
            config.tools.number_facts_url.clone(),
        )?));
    }
    Ok(registry)
}

/// Pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskcast_core::error::ProviderError;
    use riskcast_core::provider::{ProviderRequest, RawCompletion};

    struct Offline;

    #[async_trait::async_trait]
    impl Provider for Offline {
        fn name(&self) -> &str {
            "offline"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<RawCompletion, ProviderError> {
            Err(ProviderError::NotConfigured("offline".into()))
        }
    }

    #[test]
    fn missing_projects_file_is_an_empty_store() {
        let store = load_store(Path::new("/nonexistent/riskcast/projects.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn projects_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(
            &path,
            r#"{"projects": [{"id": "p1", "name": "Bridge", "milestones": [{"date": "2024-01", "title": "Start", "notes": "kickoff"}]}]}"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.retrieval.projects_path = path;
        let app = App::with_provider(config, Arc::new(Offline)).unwrap();
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.model(None), app.config.models.default_model);
        assert_eq!(app.model(Some("other".into())), "other");
    }

    #[test]
    fn events_reach_the_memory_sink() {
        let mut config = AppConfig::default();
        config.retrieval.projects_path = PathBuf::from("/nonexistent/projects.json");
        let app = App::with_provider(config, Arc::new(Offline)).unwrap();

        app.sink.record(&riskcast_core::LogEvent::new("/ask", "planner", "hi"));
        assert_eq!(app.events.len(), 1);
    }

    #[test]
    fn configured_event_log_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.retrieval.projects_path = dir.path().join("missing.json");
        config.logging.events_path = Some(dir.path().join("events.jsonl"));
        let app = App::with_provider(config, Arc::new(Offline)).unwrap();

        app.sink.record(&riskcast_core::LogEvent::new("/query", "chat", "hi"));
        let written = riskcast_telemetry::read_events(dir.path().join("events.jsonl")).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].agent, "chat");
    }

    #[test]
    fn number_facts_follow_config() {
        let mut config = AppConfig::default();
        let store = Arc::new(DocumentStore::default());
        assert!(tool_registry(&config, store.clone()).unwrap().contains("number_fact"));

        config.tools.number_facts = false;
        let registry = tool_registry(&config, store).unwrap();
        assert_eq!(registry.names(), vec!["calculator", "project_lookup"]);
    }

    #[test]
    fn explicit_config_path_wins() {
        assert_eq!(config_path(Some(Path::new("/tmp/x.toml"))), PathBuf::from("/tmp/x.toml"));
        assert!(config_path(None).ends_with("config.toml"));
    }
}

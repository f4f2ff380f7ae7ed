//! Configuration loading, validation, and management for riskcast.
//!
//! Loads configuration from `~/.riskcast/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.riskcast/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model gateway connection
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Model identifiers
    #[serde(default)]
    pub models: ModelsConfig,

    /// Retry policy for completion calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Retrieval and chunking settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Pipeline event log
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Agent tools that reach outside the process
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the OpenAI-compatible gateway
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-attempt request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:4000".into()
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Model for single-model commands (query, agent, doc)
    #[serde(default = "default_model")]
    pub default_model: String,

    /// First model of an evaluation pair; also runs the forecaster
    #[serde(default = "default_model")]
    pub model_a: String,

    /// Second model of an evaluation pair
    #[serde(default = "default_model_b")]
    pub model_b: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Grades answers in `riskcast evals`
    #[serde(default = "default_model")]
    pub judge_model: String,
}

fn default_model() -> String {
    "gpt-4.1-mini".into()
}
fn default_model_b() -> String {
    "claude-3-5-sonnet".into()
}
fn default_embedding_model() -> String {
    "text-embedding-ada-002".into()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            model_a: default_model(),
            model_b: default_model_b(),
            embedding_model: default_embedding_model(),
            judge_model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Additional attempts after the first failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Linear backoff step: attempt `n` waits `n * backoff_ms`
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_retries() -> u32 {
    2
}
fn default_backoff_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// JSON file with `{"projects": [...]}`
    #[serde(default = "default_projects_path")]
    pub projects_path: PathBuf,

    /// Milestones returned per lexical retrieval
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Words per document chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Words shared by consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Chunks returned per document question
    #[serde(default = "default_top_k")]
    pub document_top_k: usize,
}

fn default_projects_path() -> PathBuf {
    PathBuf::from("data/projects.json")
}
fn default_top_k() -> usize {
    3
}
fn default_chunk_size() -> usize {
    500
}
fn default_chunk_overlap() -> usize {
    50
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            projects_path: default_projects_path(),
            top_k: default_top_k(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            document_top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Append every pipeline event to this file as JSON lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Let the agent look up a fact for the first integer in a task
    #[serde(default = "default_true")]
    pub number_facts: bool,

    /// Numbers API compatible service
    #[serde(default = "default_number_facts_url")]
    pub number_facts_url: String,
}

fn default_true() -> bool {
    true
}
fn default_number_facts_url() -> String {
    "http://numbersapi.com".into()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            number_facts: true,
            number_facts_url: default_number_facts_url(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.riskcast/config.toml).
    ///
    /// Also checks environment variables:
    /// - `RISKCAST_API_KEY`, then `LITELLM_API_KEY` for the gateway key
    /// - `RISKCAST_BASE_URL` for the gateway URL
    /// - `RISKCAST_MODEL` for the default model
    /// - `RISKCAST_EVENTS_PATH` for the pipeline event log
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from a specific path, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup. The file's key wins over
    /// the environment; URL and model overrides always win.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.gateway.api_key.is_none() {
            self.gateway.api_key = lookup("RISKCAST_API_KEY").or_else(|| lookup("LITELLM_API_KEY"));
        }

        if let Some(url) = lookup("RISKCAST_BASE_URL") {
            self.gateway.base_url = url;
        }

        if let Some(model) = lookup("RISKCAST_MODEL") {
            self.models.default_model = model;
        }

        if let Some(path) = lookup("RISKCAST_EVENTS_PATH") {
            self.logging.events_path = Some(PathBuf::from(path));
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".riskcast")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("gateway.base_url must not be empty".into()));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("gateway.timeout_secs must be > 0".into()));
        }

        if self.tools.number_facts && self.tools.number_facts_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "tools.number_facts_url must not be empty while tools.number_facts is on".into(),
            ));
        }

        if self.retrieval.chunk_size == 0 || self.retrieval.chunk_overlap >= self.retrieval.chunk_size {
            return Err(ConfigError::ValidationError(
                "retrieval.chunk_overlap must be smaller than a non-zero retrieval.chunk_size".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

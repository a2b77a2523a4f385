//! Configuration for govflow service endpoints and demo pacing.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (GOVFLOW_GOVERNANCE_URL, GOVFLOW_ADAPTER_URL,
//!    GOVFLOW_ANALYSIS_URL, GOVFLOW_ANALYSIS_MODEL, GOVFLOW_ANALYSIS_KEY)
//! 2. Config file (.govflow/config.yaml)
//! 3. Defaults (local development ports)
//!
//! Config file discovery:
//! - Searches current directory and parents for .govflow/config.yaml
//! - Falls back to ~/.govflow/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicesConfig {
    /// Governance API base URL (registry, seeding)
    pub governance_url: Option<String>,
    /// SAP adapter base URL (decision evaluation)
    pub adapter_url: Option<String>,
    /// Chat-completion API base URL (batch analysis)
    pub analysis_url: Option<String>,
    /// Model used for batch analysis
    pub analysis_model: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoConfig {
    /// Pacing between bounded-run dispatches, milliseconds
    pub pace_ms: Option<u64>,
    /// Pacing between extended-run dispatches, milliseconds
    pub live_pace_ms: Option<u64>,
    /// Number of events in an extended run
    pub live_count: Option<usize>,
}

/// Resolved configuration with defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub governance_url: String,
    pub adapter_url: String,
    pub analysis_url: String,
    pub analysis_model: String,
    /// Bearer token for the analysis service (env only, never in YAML)
    pub analysis_api_key: Option<String>,
    pub timeout_seconds: u64,
    pub pace_ms: u64,
    pub live_pace_ms: u64,
    pub live_count: usize,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            governance_url: "http://localhost:8000".to_string(),
            adapter_url: "http://localhost:8002".to_string(),
            analysis_url: "https://api.openai.com/v1".to_string(),
            analysis_model: "gpt-4o-mini".to_string(),
            analysis_api_key: None,
            timeout_seconds: 15,
            pace_ms: 500,
            live_pace_ms: 3000,
            live_count: 100,
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Per-request HTTP timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Pacing delay for a bounded run
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }

    /// Pacing delay for an extended run
    pub fn live_pace(&self) -> Duration {
        Duration::from_millis(self.live_pace_ms)
    }
}

/// Find config file by searching current directory and parents,
/// then the home directory
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(".govflow").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = dirs::home_dir()?.join(".govflow").join("config.yaml");
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::default();

    let config_file = find_config_file();
    if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        let services = config.services;
        if let Some(url) = services.governance_url {
            resolved.governance_url = url;
        }
        if let Some(url) = services.adapter_url {
            resolved.adapter_url = url;
        }
        if let Some(url) = services.analysis_url {
            resolved.analysis_url = url;
        }
        if let Some(model) = services.analysis_model {
            resolved.analysis_model = model;
        }
        if let Some(timeout) = services.timeout_seconds {
            resolved.timeout_seconds = timeout;
        }

        let demo = config.demo;
        if let Some(pace) = demo.pace_ms {
            resolved.pace_ms = pace;
        }
        if let Some(pace) = demo.live_pace_ms {
            resolved.live_pace_ms = pace;
        }
        if let Some(count) = demo.live_count {
            resolved.live_count = count;
        }
    }

    if let Some(url) = env_override("GOVFLOW_GOVERNANCE_URL") {
        resolved.governance_url = url;
    }
    if let Some(url) = env_override("GOVFLOW_ADAPTER_URL") {
        resolved.adapter_url = url;
    }
    if let Some(url) = env_override("GOVFLOW_ANALYSIS_URL") {
        resolved.analysis_url = url;
    }
    if let Some(model) = env_override("GOVFLOW_ANALYSIS_MODEL") {
        resolved.analysis_model = model;
    }
    resolved.analysis_api_key =
        env_override("GOVFLOW_ANALYSIS_KEY").or_else(|| env_override("OPENAI_API_KEY"));

    resolved.config_file = config_file;
    Ok(resolved)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

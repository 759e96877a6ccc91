//! Configuration management for Glint components

use glint_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Check discovery settings
    #[serde(default)]
    pub checks: ChecksConfig,

    /// Output sink settings
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP request settings shared by all checks
    #[serde(default)]
    pub request: RequestConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.engine.threads == 0 {
            return Err(Error::Configuration(
                "engine.threads must be at least 1".into(),
            ));
        }
        if self.engine.timeout_seconds == 0 {
            return Err(Error::Configuration(
                "engine.timeout_seconds must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Merge with environment variables (GLINT_ prefix)
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        // Engine settings
        if let Some(n) = var("GLINT_THREADS").and_then(|v| v.parse().ok()) {
            self.engine.threads = n;
        }
        if let Some(n) = var("GLINT_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.engine.timeout_seconds = n;
        }

        // Checks
        if let Some(val) = var("GLINT_CHECKS_PATH") {
            self.checks.path = PathBuf::from(val);
        }

        // Requests
        if let Some(val) = var("GLINT_USER_AGENT") {
            self.request.user_agent = val;
        }
        if let Some(val) = var("GLINT_PROXY") {
            self.request.proxy = Some(val);
        }

        // Logging
        if let Some(val) = var("GLINT_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = var("GLINT_LOG_FORMAT") {
            self.logging.format = val;
        }

        self
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of worker threads
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Wall-clock budget for a whole run, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_threads() -> usize {
    10
}

fn default_timeout() -> u64 {
    300
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Check discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksConfig {
    /// Directory holding check definitions, grouped by category
    #[serde(default = "default_checks_path")]
    pub path: PathBuf,
}

fn default_checks_path() -> PathBuf {
    PathBuf::from("checks")
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            path: default_checks_path(),
        }
    }
}

/// Output sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enabled sinks, in dispatch order
    #[serde(default = "default_sinks")]
    pub sinks: Vec<String>,

    /// File written by the text sink
    #[serde(default = "default_text_path")]
    pub text_path: PathBuf,

    /// File written by the json sink
    #[serde(default = "default_json_path")]
    pub json_path: PathBuf,
}

fn default_sinks() -> Vec<String> {
    vec![String::from("console")]
}

fn default_text_path() -> PathBuf {
    PathBuf::from("result.txt")
}

fn default_json_path() -> PathBuf {
    PathBuf::from("result.jsonl")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sinks: default_sinks(),
            text_path: default_text_path(),
            json_path: default_json_path(),
        }
    }
}

/// HTTP request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept invalid TLS certificates
    #[serde(default)]
    pub insecure: bool,

    /// Headers added to every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Proxy URL for all requests; environment proxies are not used
    #[serde(default)]
    pub proxy: Option<String>,
}

fn default_request_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("glint/{}", env!("CARGO_PKG_VERSION"))
}

impl RequestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_request_timeout(),
            user_agent: default_user_agent(),
            insecure: false,
            headers: BTreeMap::new(),
            proxy: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Builder for constructing Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.config.engine.threads = threads;
        self
    }

    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.config.engine.timeout_seconds = seconds;
        self
    }

    pub fn checks_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.checks.path = path.into();
        self
    }

    pub fn sinks<I, S>(mut self, sinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.output.sinks = sinks.into_iter().map(Into::into).collect();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.request.user_agent = agent.into();
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Server configuration module
//!
//! Handles loading and parsing of server configuration from files and environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the configuration file
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Directory served under /static
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Chat-completion service configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Retry policy applied to every gateway operation
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Chat-completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API key (normally supplied through OPENAI_API_KEY)
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Model used to generate worlds
    #[serde(default = "default_fast_model")]
    pub world_model: String,

    /// Model used to render objects as HTML
    #[serde(default = "default_fast_model")]
    pub render_model: String,

    /// Model used to list object interactions
    #[serde(default = "default_fast_model")]
    pub interaction_model: String,

    /// Model used to apply interactions and compute ticks
    #[serde(default = "default_engine_model")]
    pub engine_model: String,

    /// Sampling temperature (provider default when unset)
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Timeout for a single completion request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per operation (0 = retry until success)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Upper bound for the delay between attempts in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,

    /// Growth factor applied to the delay after each failure
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Randomize each delay by up to +/-25%
    #[serde(default = "default_true")]
    pub jitter: bool,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_fast_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_engine_model() -> String {
    "gpt-4".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_backoff() -> u64 {
    250
}

fn default_max_backoff() -> u64 {
    5000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: String::new(),
            world_model: default_fast_model(),
            render_model: default_fast_model(),
            interaction_model: default_fast_model(),
            engine_model: default_engine_model(),
            temperature: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            multiplier: default_multiplier(),
            jitter: default_true(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config/server.toml"),
            bind_address: default_bind_address(),
            http_port: default_http_port(),
            static_dir: default_static_dir(),
            llm: LlmConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Read a numeric environment override, warning when it does not parse
fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
    let val = env::var(name).ok()?;
    match val.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid number", name, val);
            None
        }
    }
}

impl ServerConfig {
    /// Load configuration from .env, the config file and environment variables
    pub async fn load() -> Result<Self> {
        // A missing .env is fine; real deployments set the environment directly
        let _ = dotenv::dotenv();

        let config_path = env::var("WORLDGEN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/server.toml"));

        let mut config = if config_path.exists() {
            let content = tokio::fs::read_to_string(&config_path)
                .await
                .with_context(|| {
                    format!("Failed to read config file: {}", config_path.display())
                })?;

            Self::from_toml(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            tracing::warn!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        config.config_path = config_path;

        config.apply_env_overrides();

        config.validate()?;

        if config.llm.api_key.is_empty() {
            tracing::warn!("OPENAI_API_KEY is not set; every gateway call will fail");
        }

        Ok(config)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("WORLDGEN_BIND_ADDRESS") {
            self.bind_address = val;
        }
        if let Some(port) = env_parsed("WORLDGEN_HTTP_PORT") {
            self.http_port = port;
        }
        if let Ok(val) = env::var("WORLDGEN_STATIC_DIR") {
            self.static_dir = PathBuf::from(val);
        }

        if let Ok(val) = env::var("OPENAI_API_KEY") {
            self.llm.api_key = val;
        }
        if let Ok(val) = env::var("OPENAI_API_BASE") {
            self.llm.api_base = val;
        }
        if let Ok(val) = env::var("WORLDGEN_WORLD_MODEL") {
            self.llm.world_model = val;
        }
        if let Ok(val) = env::var("WORLDGEN_RENDER_MODEL") {
            self.llm.render_model = val;
        }
        if let Ok(val) = env::var("WORLDGEN_INTERACTION_MODEL") {
            self.llm.interaction_model = val;
        }
        if let Ok(val) = env::var("WORLDGEN_ENGINE_MODEL") {
            self.llm.engine_model = val;
        }
        if let Some(secs) = env_parsed("WORLDGEN_LLM_TIMEOUT_SECS") {
            self.llm.request_timeout_secs = secs;
        }

        if let Some(attempts) = env_parsed("WORLDGEN_MAX_ATTEMPTS") {
            self.retry.max_attempts = attempts;
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            anyhow::bail!("HTTP port must be non-zero");
        }

        let models = [
            &self.llm.world_model,
            &self.llm.render_model,
            &self.llm.interaction_model,
            &self.llm.engine_model,
        ];
        if models.iter().any(|m| m.trim().is_empty()) {
            anyhow::bail!("Model names must not be empty");
        }

        if self.llm.request_timeout_secs == 0 {
            anyhow::bail!("LLM request timeout must be at least 1 second");
        }

        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            anyhow::bail!("Initial backoff must not exceed max backoff");
        }

        if !(self.retry.multiplier >= 1.0) {
            anyhow::bail!("Backoff multiplier must be >= 1.0");
        }

        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }
}

//! Application state module
//!
//! Wires configuration, the model client and the gateway together.

use std::sync::Arc;

use tracing::info;

use crate::api::ApiState;
use crate::config::ServerConfig;
use crate::error::LlmError;
use crate::gateway::{Gateway, ModelSelection, RetryPolicy};
use crate::llm::{ChatModel, OpenAiClient};

/// Application state shared across all requests
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Prompt gateway
    pub gateway: Arc<Gateway>,
}

impl AppState {
    /// Create application state backed by the configured chat-completion API
    pub fn new(config: ServerConfig) -> Result<Self, LlmError> {
        let client = OpenAiClient::new(&config.llm)?;
        info!(endpoint = client.endpoint(), "Model client initialized");

        Ok(Self::with_model(config, Arc::new(client)))
    }

    /// Create application state around any chat model
    pub fn with_model(config: ServerConfig, model: Arc<dyn ChatModel>) -> Self {
        let models = ModelSelection::from(&config.llm);
        let retry = RetryPolicy::from(&config.retry);

        match retry.max_attempts {
            Some(max) => info!(
                max_attempts = max,
                initial_backoff_ms = config.retry.initial_backoff_ms,
                "Configuring gateway retries"
            ),
            None => info!("Configuring gateway retries: unlimited attempts"),
        }

        Self {
            gateway: Arc::new(Gateway::new(model, models, retry)),
            config,
        }
    }

    /// State handed to the HTTP router
    pub fn api_state(&self) -> ApiState {
        ApiState {
            gateway: self.gateway.clone(),
        }
    }
}

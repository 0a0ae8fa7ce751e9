//! Prompt-response gateway
//!
//! Every operation follows the same shape: build a prompt from the caller's
//! state, ask the model, cut the payload out of the reply, decode it. Any
//! failure along the way retries the whole attempt under the [`RetryPolicy`].

pub mod extract;
pub mod prompts;
pub mod retry;

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::config::LlmConfig;
use crate::error::{GatewayError, Result};
use crate::llm::{ChatMessage, ChatModel};
use crate::world::{Effects, ObjectInteraction, World, WorldObject};

pub use extract::{extract_payload, slice_between, Delimiters};
pub use retry::RetryPolicy;

/// Model identifier used by each operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub world: String,
    pub render: String,
    pub interactions: String,
    pub engine: String,
}

impl From<&LlmConfig> for ModelSelection {
    fn from(config: &LlmConfig) -> Self {
        Self {
            world: config.world_model.clone(),
            render: config.render_model.clone(),
            interactions: config.interaction_model.clone(),
            engine: config.engine_model.clone(),
        }
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

/// Interaction replies come either as a bare list or wrapped in an object
#[derive(Deserialize)]
#[serde(untagged)]
enum InteractionsReply {
    List(Vec<ObjectInteraction>),
    Wrapped { interactions: Vec<ObjectInteraction> },
}

impl InteractionsReply {
    fn into_vec(self) -> Vec<ObjectInteraction> {
        match self {
            InteractionsReply::List(list) => list,
            InteractionsReply::Wrapped { interactions } => interactions,
        }
    }
}

/// Decode an interaction list and append the free-form `custom` interaction
pub fn parse_interactions(payload: &str) -> Result<Vec<ObjectInteraction>> {
    let mut interactions = serde_json::from_str::<InteractionsReply>(payload)?.into_vec();
    interactions.push(ObjectInteraction::custom());
    Ok(interactions)
}

/// Turns game requests into model calls
pub struct Gateway {
    model: Arc<dyn ChatModel>,
    models: ModelSelection,
    retry: RetryPolicy,
}

impl Gateway {
    pub fn new(model: Arc<dyn ChatModel>, models: ModelSelection, retry: RetryPolicy) -> Self {
        Self {
            model,
            models,
            retry,
        }
    }

    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Build a world from a free-text description
    pub async fn generate_world(&self, description: &str) -> Result<World> {
        let messages = prompts::generate_world(description);
        let world: World = self
            .run(
                "generate_world",
                &self.models.world,
                &messages,
                Delimiters::Brace,
                |payload| Ok(serde_json::from_str(payload)?),
            )
            .await?;

        for issue in world.audit() {
            warn!(issue = %issue, "Generated world breaks a world invariant");
        }

        Ok(world)
    }

    /// Render an object as an HTML fragment
    pub async fn render_object(&self, world: &World, object: &WorldObject) -> Result<String> {
        let messages = prompts::render_object(world, object)?;
        self.run(
            "render_object",
            &self.models.render,
            &messages,
            Delimiters::Angle,
            |payload| Ok(payload.to_string()),
        )
        .await
    }

    /// List what the player can do with an object. The last entry is always
    /// the `custom` interaction.
    pub async fn list_interactions(
        &self,
        world: &World,
        object: &WorldObject,
    ) -> Result<Vec<ObjectInteraction>> {
        let messages = prompts::list_interactions(world, object)?;
        self.run(
            "list_interactions",
            &self.models.interactions,
            &messages,
            Delimiters::Bracket,
            parse_interactions,
        )
        .await
    }

    /// Ask the model what an interaction does to the world
    pub async fn apply_interaction(
        &self,
        world: &World,
        object: &WorldObject,
        interaction: &ObjectInteraction,
    ) -> Result<Effects> {
        let messages = prompts::apply_interaction(world, object, interaction)?;
        self.run(
            "apply_interaction",
            &self.models.engine,
            &messages,
            Delimiters::Brace,
            |payload| Ok(serde_json::from_str(payload)?),
        )
        .await
    }

    /// Ask the model how the world changes over one tick
    pub async fn advance_tick(&self, world: &World) -> Result<Effects> {
        let messages = prompts::advance_tick(world)?;
        self.run(
            "advance_tick",
            &self.models.engine,
            &messages,
            Delimiters::Brace,
            |payload| Ok(serde_json::from_str(payload)?),
        )
        .await
    }

    /// One model call, extraction and decode
    async fn attempt<T, F>(
        &self,
        model: &str,
        messages: &[ChatMessage],
        delimiters: Delimiters,
        parse: &F,
    ) -> Result<T>
    where
        F: Fn(&str) -> Result<T>,
    {
        let reply = self.model.complete(model, messages).await?;
        let payload = extract_payload(&reply, delimiters)?;
        parse(payload)
    }

    /// Run attempts until one succeeds or the retry policy gives up
    async fn run<T, F>(
        &self,
        operation: &'static str,
        model: &str,
        messages: &[ChatMessage],
        delimiters: Delimiters,
        parse: F,
    ) -> Result<T>
    where
        F: Fn(&str) -> Result<T>,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            debug!(operation, model, attempt, "Calling model");

            let err = match self.attempt(model, messages, delimiters, &parse).await {
                Ok(value) => {
                    if attempt > 1 {
                        info!(operation, attempt, "Operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                error!(operation, attempt, error = %err, "Operation failed");
                return Err(err);
            }

            if !self.retry.allows_another(attempt) {
                error!(operation, attempt, error = %err, "Giving up on operation");
                return Err(GatewayError::RetriesExhausted {
                    operation,
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.retry.delay(attempt);
            warn!(
                operation,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Attempt failed, retrying"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

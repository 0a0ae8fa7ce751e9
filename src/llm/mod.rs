//! Chat-completion client abstraction
//!
//! The gateway only needs one capability from the model service: send a list
//! of role-tagged messages to a named model and get text back. `ChatModel`
//! captures that so tests can substitute a scripted model.

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

pub use openai::OpenAiClient;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat-completion backend
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion and return the text of the first choice
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

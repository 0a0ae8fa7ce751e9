//! Error handling module
//!
//! Defines the error types produced by the LLM client and the prompt gateway.

use thiserror::Error;

/// Errors talking to the chat-completion service
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    Decode(String),

    #[error("Completion contained no message content")]
    EmptyReply,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

/// Failure to locate the structured payload inside a model reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Start delimiter '{0}' not found in reply")]
    MissingStart(char),

    #[error("End delimiter '{0}' not found in reply")]
    MissingEnd(char),

    #[error("Last '{end}' appears before first '{start}'")]
    Inverted { start: char, end: char },
}

/// Errors produced by a single gateway operation
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Reply did not match expected schema: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Prompt serialization failed: {0}")]
    Prompt(String),

    #[error("{operation} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        last: Box<GatewayError>,
    },
}

impl GatewayError {
    /// Whether another attempt of the same operation could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Llm(LlmError::MissingApiKey) => false,
            GatewayError::Llm(_) => true,
            GatewayError::Extraction(_) => true,
            GatewayError::Decode(_) => true,
            GatewayError::Prompt(_) => false,
            GatewayError::RetriesExhausted { .. } => false,
        }
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

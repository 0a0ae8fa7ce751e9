//! OpenAI-compatible `/chat/completions` client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatMessage, ChatModel};
use crate::config::LlmConfig;
use crate::error::LlmError;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-style chat-completion endpoint
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    temperature: Option<f32>,
}

impl OpenAiClient {
    /// Build a client from configuration
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: completions_url(&config.api_base),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        })
    }

    /// Full URL completions are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn completions_url(api_base: &str) -> String {
    format!("{}/chat/completions", api_base.trim_end_matches('/'))
}

/// Pull the first choice's text out of a completion body
fn first_choice(body: &str) -> Result<String, LlmError> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Decode(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyReply)
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let request = CompletionRequest {
            model,
            messages,
            temperature: self.temperature,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(model, bytes = body.len(), "Completion received");

        first_choice(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        assert_eq!(
            completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:11434/v1"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_first_choice() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"{\"objects\":[]}"}}]}"#;
        assert_eq!(first_choice(body).unwrap(), r#"{"objects":[]}"#);
    }

    #[test]
    fn test_first_choice_empty() {
        assert!(matches!(
            first_choice(r#"{"choices":[]}"#),
            Err(LlmError::EmptyReply)
        ));
        assert!(matches!(
            first_choice(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(LlmError::EmptyReply)
        ));
        assert!(matches!(first_choice("<html>"), Err(LlmError::Decode(_))));
    }

    #[test]
    fn test_request_omits_unset_temperature() {
        let messages = [ChatMessage::user("hello")];
        let request = CompletionRequest {
            model: "gpt-4",
            messages: &messages,
            temperature: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_fast() {
        let client = OpenAiClient::new(&LlmConfig::default()).unwrap();
        let result = client.complete("gpt-4", &[ChatMessage::user("hi")]).await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }
}

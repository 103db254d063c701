//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{CompletionError, CompletionRequest, CompletionService};
use crate::config::CompletionConfig;

pub struct OpenAiClient {
  client: Client,
  config: CompletionConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: [ChatMessage<'a>; 1],
  temperature: f64,
  top_p: f64,
  max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
  content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
  error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
  message: String,
}

impl OpenAiClient {
  pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| CompletionError::Provider(e.to_string()))?;

    Ok(Self { client, config })
  }

  fn endpoint(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

/// Pull the provider's message out of an error body, falling back to the raw text
fn error_message(body: &str) -> Option<String> {
  if body.trim().is_empty() {
    return None;
  }
  match serde_json::from_str::<ErrorEnvelope>(body) {
    Ok(envelope) => Some(envelope.error.message),
    Err(_) => Some(body.trim().to_string()),
  }
}

#[async_trait]
impl CompletionService for OpenAiClient {
  async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
    let api_key = self
      .config
      .api_key
      .as_deref()
      .filter(|key| !key.is_empty())
      .ok_or(CompletionError::MissingApiKey)?;

    let body = ChatRequest {
      model: &self.config.model,
      messages: [ChatMessage { role: "user", content: &request.prompt }],
      temperature: request.temperature,
      top_p: request.top_p,
      max_tokens: request.max_tokens,
    };

    debug!(temperature = request.temperature, top_p = request.top_p, "requesting completion");

    let response = self
      .client
      .post(self.endpoint())
      .bearer_auth(api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| CompletionError::Provider(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let text = response.text().await.unwrap_or_default();
      return Err(CompletionError::from_status(status.as_u16(), error_message(&text)));
    }

    let parsed: ChatResponse =
      response.json().await.map_err(|e| CompletionError::Provider(e.to_string()))?;

    Ok(
      parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default(),
    )
  }
}

//! Completion service abstraction
//!
//! The runner only depends on [`CompletionService`]; the OpenAI-compatible
//! HTTP client is one implementation of it.

use async_trait::async_trait;
use thiserror::Error;

pub mod openai;

pub use openai::OpenAiClient;

/// One completion call for one grid point
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
  pub prompt: String,
  pub temperature: f64,
  pub top_p: f64,
  pub max_tokens: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
  #[error("OPENAI_API_KEY environment variable is not set")]
  MissingApiKey,

  #[error("Rate limit exceeded. Please try again later.")]
  RateLimited,

  #[error("Invalid API key. Please check your OpenAI API key.")]
  Unauthorized,

  #[error("OpenAI service is temporarily unavailable. Please try again.")]
  ServiceUnavailable,

  #[error("OpenAI API error: {0}")]
  Provider(String),
}

impl CompletionError {
  /// Map a non-success HTTP status (and the provider's message, if any)
  pub fn from_status(status: u16, message: Option<String>) -> Self {
    match status {
      429 => Self::RateLimited,
      401 => Self::Unauthorized,
      500 | 503 => Self::ServiceUnavailable,
      _ => Self::Provider(message.unwrap_or_else(|| "Unknown error".to_string())),
    }
  }
}

/// Produces completion text for a prompt at given sampling parameters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionService: Send + Sync {
  async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

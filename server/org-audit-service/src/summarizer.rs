//! HTTP summarizer client for OpenAI-compatible chat completion endpoints.
//!
//! Constructed once at startup and shared through `AppState`. Every failure comes back
//! as a `SummarizerError`; callers turn it into placeholder text.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use org_audit_engine::SummarizerError;

use crate::config::SummarizerConfig;

pub struct HttpSummarizer {
  config: SummarizerConfig,
  client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
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
  message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
  #[serde(default)]
  content: Option<String>,
}

impl HttpSummarizer {
  pub fn new(config: SummarizerConfig) -> Result<Self, SummarizerError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| SummarizerError::Transport(e.to_string()))?;
    Ok(Self { config, client })
  }

  pub fn config(&self) -> &SummarizerConfig {
    &self.config
  }

  /// Send one prompt and return the first choice's text.
  pub async fn summarize(&self, prompt: &str) -> Result<String, SummarizerError> {
    let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
    let body = ChatRequest {
      model: &self.config.model,
      messages: vec![ChatMessage {
        role: "user",
        content: prompt,
      }],
      max_tokens: self.config.max_tokens,
    };

    let mut request = self.client.post(&url).json(&body);
    if let Some(key) = &self.config.api_key {
      request = request.bearer_auth(key);
    }

    debug!(url = %url, model = %self.config.model, "calling summarizer");
    let response = request.send().await.map_err(|e| self.transport_error(e))?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());
      return Err(SummarizerError::Status { status, body });
    }

    let parsed: ChatResponse = response.json().await.map_err(|e| {
      if e.is_timeout() {
        SummarizerError::Timeout(self.config.timeout_secs)
      } else {
        SummarizerError::Decode(e.to_string())
      }
    })?;

    parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .map(|text| text.trim().to_string())
      .filter(|text| !text.is_empty())
      .ok_or(SummarizerError::Empty)
  }

  fn transport_error(&self, e: reqwest::Error) -> SummarizerError {
    if e.is_timeout() {
      SummarizerError::Timeout(self.config.timeout_secs)
    } else {
      SummarizerError::Transport(e.to_string())
    }
  }
}

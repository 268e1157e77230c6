//! Service configuration from environment variables.

use std::net::IpAddr;
use std::time::Duration;

use org_audit_engine::AuditConfig;

use crate::error::ConfigError;

/// OpenAI-compatible chat endpoint used for recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizerConfig {
  /// Base URL, without the `/chat/completions` suffix.
  pub base_url: String,
  pub api_key: Option<String>,
  pub model: String,
  /// Per-request client timeout in seconds.
  pub timeout_secs: u64,
  pub max_tokens: u32,
  /// Off unless a key or an explicit base URL is configured.
  pub enabled: bool,
}

impl Default for SummarizerConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.openai.com/v1".to_string(),
      api_key: None,
      model: "gpt-4o-mini".to_string(),
      timeout_secs: 20,
      max_tokens: 600,
      enabled: false,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
  pub bind_addr: IpAddr,
  pub port: u16,
  /// Upper bound on the summarizer call for one request.
  pub request_timeout: Duration,
  pub summarizer: SummarizerConfig,
  pub audit: AuditConfig,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      bind_addr: IpAddr::from([127, 0, 0, 1]),
      port: 5005,
      request_timeout: Duration::from_secs(30),
      summarizer: SummarizerConfig::default(),
      audit: AuditConfig::default(),
    }
  }
}

impl ServiceConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build from any key lookup; unset keys keep their defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut config = Self::default();
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("BIND_ADDR") {
      config.bind_addr = parse("BIND_ADDR", &v)?;
    }
    if let Some(v) = get("PORT") {
      config.port = parse("PORT", &v)?;
    }
    if let Some(v) = get("AUDIT_REQUEST_TIMEOUT_SECS") {
      config.request_timeout = Duration::from_secs(parse("AUDIT_REQUEST_TIMEOUT_SECS", &v)?);
    }

    let summarizer = &mut config.summarizer;
    if let Some(v) = get("SUMMARIZER_BASE_URL") {
      summarizer.base_url = v.trim_end_matches('/').to_string();
      summarizer.enabled = true;
    }
    if let Some(v) = get("SUMMARIZER_API_KEY") {
      summarizer.api_key = Some(v);
      summarizer.enabled = true;
    }
    if let Some(v) = get("SUMMARIZER_MODEL") {
      summarizer.model = v;
    }
    if let Some(v) = get("SUMMARIZER_TIMEOUT_SECS") {
      summarizer.timeout_secs = parse("SUMMARIZER_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = get("SUMMARIZER_MAX_TOKENS") {
      summarizer.max_tokens = parse("SUMMARIZER_MAX_TOKENS", &v)?;
    }

    config.audit = AuditConfig::default()
      .apply_overrides(&get)
      .map_err(ConfigError::Audit)?;
    Ok(config)
  }
}

fn parse<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
  value.trim().parse().map_err(|_| ConfigError::invalid(var, value))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn from(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    ServiceConfig::from_lookup(|k| map.get(k).cloned())
  }

  #[test]
  fn defaults_without_env() {
    let config = from(&[]).unwrap();
    assert_eq!(config, ServiceConfig::default());
    assert!(!config.summarizer.enabled);
  }

  #[test]
  fn key_enables_summarizer() {
    let config = from(&[
      ("SUMMARIZER_API_KEY", "sk-test"),
      ("SUMMARIZER_TIMEOUT_SECS", "5"),
      ("PORT", "8080"),
      ("ORG_AUDIT_MIN_SPAN", "3"),
    ])
    .unwrap();
    assert!(config.summarizer.enabled);
    assert_eq!(config.summarizer.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.summarizer.timeout_secs, 5);
    assert_eq!(config.port, 8080);
    assert_eq!(config.audit.min_span_threshold, 3);
  }

  #[test]
  fn bad_values_are_rejected() {
    let err = from(&[("PORT", "eighty")]).unwrap_err();
    assert!(err.to_string().contains("PORT"));
    assert!(from(&[("ORG_AUDIT_LEVEL_CHECK", "maybe")]).is_err());
  }
}

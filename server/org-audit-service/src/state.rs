//! Shared, read-only state for request handlers.

use std::time::Duration;

use org_audit_engine::Auditor;

use crate::summarizer::HttpSummarizer;

pub struct AppState {
  pub auditor: Auditor,
  /// `None` when no summarizer is configured; responses carry the placeholder text.
  pub summarizer: Option<HttpSummarizer>,
  pub request_timeout: Duration,
}

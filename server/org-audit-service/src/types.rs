//! Request/response types for the audit service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use org_audit_engine::{AuditReport, SummaryOutcome};

#[derive(Debug, Serialize)]
pub struct AuditResponse {
  pub request_id: Uuid,
  pub generated_at: DateTime<Utc>,
  pub report: AuditReport,
  /// Summarizer text verbatim, or a placeholder line when it was unavailable.
  pub recommendations: String,
  pub summary_status: SummaryStatus,
}

/// Whether `recommendations` came from the summarizer; the text itself is not repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryStatus {
  Generated,
  Unavailable { reason: String },
}

impl SummaryStatus {
  pub fn is_generated(&self) -> bool {
    matches!(self, Self::Generated)
  }
}

impl From<SummaryOutcome> for SummaryStatus {
  fn from(outcome: SummaryOutcome) -> Self {
    match outcome {
      SummaryOutcome::Generated { .. } => Self::Generated,
      SummaryOutcome::Unavailable { reason } => Self::Unavailable { reason },
    }
  }
}

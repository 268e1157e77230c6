//! HTTP handlers for the audit service.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use org_audit_engine::{InboundTable, SummarizerError, SummaryOutcome};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::AuditResponse;

pub async fn health() -> &'static str {
  "ok"
}

/// Audit one uploaded table. The summarizer never fails the request.
pub async fn audit(
  State(state): State<Arc<AppState>>,
  Json(table): Json<InboundTable>,
) -> Result<Json<AuditResponse>, ApiError> {
  let request_id = Uuid::new_v4();

  let report = state.auditor.audit(&table).map_err(|e| {
    warn!(%request_id, kind = e.kind(), "audit rejected: {}", e);
    ApiError::from(e)
  })?;

  let prompt = state.auditor.prompt(&report);
  let summary = SummaryOutcome::from_result(summarize(&state, &prompt).await);
  if let (Some(_), SummaryOutcome::Unavailable { reason }) = (&state.summarizer, &summary) {
    warn!(%request_id, audit_id = %report.audit_id, "recommendations unavailable: {}", reason);
  }

  info!(%request_id, audit_id = %report.audit_id, generated = summary.is_generated(), "audit served");
  Ok(Json(AuditResponse {
    request_id,
    generated_at: Utc::now(),
    recommendations: summary.display_text(),
    summary_status: summary.into(),
    report,
  }))
}

async fn summarize(state: &AppState, prompt: &str) -> Result<String, SummarizerError> {
  let summarizer = state.summarizer.as_ref().ok_or(SummarizerError::NotConfigured)?;
  match tokio::time::timeout(state.request_timeout, summarizer.summarize(prompt)).await {
    Ok(result) => result,
    Err(_) => Err(SummarizerError::Timeout(state.request_timeout.as_secs())),
  }
}

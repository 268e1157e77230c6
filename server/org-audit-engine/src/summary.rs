//! Summarizer boundary: deterministic prompt text in, opaque recommendation text out.

use serde::Serialize;

use crate::config::PromptStyle;
use crate::error::SummarizerError;
use crate::types::MetricsPayload;

const INSTRUCTIONS: &str = "You are an organizational design consultant. \
Based on the metrics below, recommend concrete restructuring actions: \
managers whose span of control is too narrow, layers that could be removed, \
and duplicated roles that could be consolidated. Answer in short bullet points.";

/// Build the summarizer prompt. Same payload, same style, same text.
pub fn build_prompt(payload: &MetricsPayload, style: PromptStyle) -> String {
  match style {
    PromptStyle::Brief => format!(
      "{}\n\n\
       Employees: {}\n\
       Departments: {}\n\
       Average span of control: {:.2}\n\
       Organizational depth: {}\n\
       Managers below span threshold: {}\n\
       Duplicated department roles: {}\n",
      INSTRUCTIONS,
      payload.employee_count,
      payload.department_count,
      payload.mean_span_of_control,
      payload.organizational_depth,
      payload.low_span_managers.len(),
      payload.duplicate_roles.len(),
    ),
    PromptStyle::Full => {
      // MetricsPayload holds only strings, integers and finite floats.
      let json = serde_json::to_string_pretty(payload).unwrap_or_default();
      format!("{}\n\nMetrics (JSON):\n{}\n", INSTRUCTIONS, json)
    }
  }
}

/// What the caller shows in place of recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
  Generated { text: String },
  Unavailable { reason: String },
}

impl SummaryOutcome {
  /// Convert a summarizer result; failures become `Unavailable`.
  pub fn from_result(result: Result<String, SummarizerError>) -> Self {
    match result {
      Ok(text) if !text.trim().is_empty() => Self::Generated { text },
      Ok(_) => Self::Unavailable {
        reason: SummarizerError::Empty.to_string(),
      },
      Err(e) => Self::Unavailable { reason: e.to_string() },
    }
  }

  pub fn is_generated(&self) -> bool {
    matches!(self, Self::Generated { .. })
  }

  /// Text verbatim, or the placeholder line.
  pub fn display_text(&self) -> String {
    match self {
      Self::Generated { text } => text.clone(),
      Self::Unavailable { reason } => format!("Recommendations unavailable: {}", reason),
    }
  }
}

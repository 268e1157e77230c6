//! Structured error types for the audit engine.

use thiserror::Error;

use crate::types::EmployeeId;

#[derive(Debug, Error)]
pub enum AuditError {
  #[error("schema: missing required columns: {}", .missing.join(", "))]
  Schema { missing: Vec<String> },

  #[error("schema: duplicate column in header: {column}")]
  DuplicateColumn { column: String },

  #[error("field: row {row}: {column}: {reason}")]
  Field {
    row: usize,
    column: String,
    reason: String,
  },

  #[error("integrity: {reason}: {}", join_ids(.ids))]
  Integrity { ids: Vec<EmployeeId>, reason: String },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl AuditError {
  pub fn schema(missing: Vec<String>) -> Self {
    Self::Schema { missing }
  }

  pub fn duplicate_column(column: &str) -> Self {
    Self::DuplicateColumn {
      column: column.to_string(),
    }
  }

  pub fn field(row: usize, column: &str, reason: impl Into<String>) -> Self {
    Self::Field {
      row,
      column: column.to_string(),
      reason: reason.into(),
    }
  }

  pub fn integrity(ids: Vec<EmployeeId>, reason: &str) -> Self {
    Self::Integrity {
      ids,
      reason: reason.to_string(),
    }
  }

  /// Stable snake_case tag for JSON error output.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Schema { .. } | Self::DuplicateColumn { .. } => "schema",
      Self::Field { .. } => "field",
      Self::Integrity { .. } => "integrity",
      Self::Json(_) => "json",
    }
  }
}

fn join_ids(ids: &[EmployeeId]) -> String {
  ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}

/// Failure of the external text-generation call. Never fatal to an audit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizerError {
  #[error("summarizer not configured")]
  NotConfigured,

  #[error("summarizer timed out after {0}s")]
  Timeout(u64),

  #[error("summarizer request failed: {0}")]
  Transport(String),

  #[error("summarizer returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("summarizer response could not be decoded: {0}")]
  Decode(String),

  #[error("summarizer returned no text")]
  Empty,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn schema_error_names_every_missing_column() {
    let err = AuditError::schema(vec!["Level".into(), "Cost".into()]);
    assert_eq!(err.to_string(), "schema: missing required columns: Level, Cost");
    assert_eq!(err.kind(), "schema");
  }

  #[test]
  fn integrity_error_cites_ids() {
    let err = AuditError::integrity(
      vec![EmployeeId::new("7"), EmployeeId::new("9")],
      "dangling manager reference",
    );
    assert_eq!(err.to_string(), "integrity: dangling manager reference: 7, 9");
    assert_eq!(err.kind(), "integrity");
  }
}

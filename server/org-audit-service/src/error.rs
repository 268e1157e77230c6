//! Service error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use org_audit_engine::types::ErrorOutput;
use org_audit_engine::AuditError;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config: {var}: invalid value {value:?}")]
  Invalid { var: String, value: String },

  #[error("config: {0}")]
  Audit(String),
}

impl ConfigError {
  pub fn invalid(var: &str, value: &str) -> Self {
    Self::Invalid {
      var: var.to_string(),
      value: value.to_string(),
    }
  }
}

/// Rejected request: status plus the engine's structured error body.
#[derive(Debug)]
pub struct ApiError {
  pub status: StatusCode,
  pub body: ErrorOutput,
}

impl From<AuditError> for ApiError {
  fn from(err: AuditError) -> Self {
    let status = match err {
      AuditError::Json(_) => StatusCode::BAD_REQUEST,
      AuditError::Schema { .. }
      | AuditError::DuplicateColumn { .. }
      | AuditError::Field { .. }
      | AuditError::Integrity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    Self {
      status,
      body: ErrorOutput::from(&err),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status, Json(self.body)).into_response()
  }
}

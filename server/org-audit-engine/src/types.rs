//! Core types for the audit engine (JSON contracts + internal models).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// One row keyed by column name. Unknown columns are carried through.
pub type RawRow = Map<String, Value>;

/// An uploaded employee table.
///
/// Accepts either a columnar export (`{"columns": [...], "rows": [[...]]}`) or a plain
/// array of row objects.
#[derive(Debug, Clone)]
pub enum InboundTable {
  Columnar {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
  },
  Records(Vec<RawRow>),
}

#[derive(Deserialize)]
struct ColumnarForm {
  columns: Vec<String>,
  rows: Vec<Vec<Value>>,
}

impl<'de> Deserialize<'de> for InboundTable {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    match Value::deserialize(deserializer)? {
      Value::Array(rows) => rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| match row {
          Value::Object(map) => Ok(map),
          other => Err(D::Error::custom(format!(
            "row {}: expected an object keyed by column name, found {}",
            i + 1,
            crate::normalize::type_name(&other)
          ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Self::Records),
      value @ Value::Object(_) => serde_json::from_value::<ColumnarForm>(value)
        .map(|form| Self::Columnar {
          columns: form.columns,
          rows: form.rows,
        })
        .map_err(|e| D::Error::custom(format!("columnar table: {}", e))),
      other => Err(D::Error::custom(format!(
        "expected an array of row objects or a {{\"columns\", \"rows\"}} object, found {}",
        crate::normalize::type_name(&other)
      ))),
    }
  }
}

impl InboundTable {
  pub fn row_count(&self) -> usize {
    match self {
      Self::Columnar { rows, .. } => rows.len(),
      Self::Records(rows) => rows.len(),
    }
  }
}

// ---------------------------------------------------------------------------
// Canonical records
// ---------------------------------------------------------------------------

/// Canonical, comparable employee identifier (`17`, `17.0` and `"17"` all map to "17").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Numeric ids compare by value and sort ahead of textual ones; text compares bytewise.
  pub fn natural_cmp(&self, other: &Self) -> std::cmp::Ordering {
    match (self.0.parse::<i128>(), other.0.parse::<i128>()) {
      (Ok(a), Ok(b)) => a.cmp(&b),
      (Ok(_), Err(_)) => std::cmp::Ordering::Less,
      (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
      (Err(_), Err(_)) => self.0.cmp(&other.0),
    }
  }
}

impl fmt::Display for EmployeeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Typed employee row after schema mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRecord {
  pub id: EmployeeId,
  pub name: String,
  pub role: String,
  pub department: String,
  /// `None` marks a root.
  pub manager: Option<EmployeeId>,
  pub level: u32,
  pub cost: f64,
  /// Pass-through columns (e.g. `Location`), not validated.
  #[serde(skip_serializing_if = "Map::is_empty")]
  pub extra: Map<String, Value>,
}

/// Report whose `Level` disagrees with its manager's level + 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelMismatch {
  pub id: EmployeeId,
  pub manager_id: EmployeeId,
  pub level: u32,
  pub expected_level: u32,
}

/// Records that passed integrity validation.
#[derive(Debug, Clone)]
pub struct ValidatedTable {
  pub records: Vec<EmployeeRecord>,
  pub level_mismatches: Vec<LevelMismatch>,
}

// ---------------------------------------------------------------------------
// Metrics payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanRow {
  pub manager_id: EmployeeId,
  /// `None` only when the manager reference does not resolve.
  pub manager_name: Option<String>,
  pub direct_reports: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelCost {
  pub level: u32,
  pub headcount: u32,
  pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRole {
  pub department: String,
  pub role: String,
  pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentCost {
  pub department: String,
  pub headcount: u32,
  pub total_cost: f64,
}

/// Aggregated, derived metrics for one audit run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsPayload {
  pub employee_count: usize,
  pub department_count: usize,
  pub manager_count: usize,
  pub mean_span_of_control: f64,
  pub organizational_depth: u32,
  pub total_cost: f64,
  pub span_of_control: Vec<SpanRow>,
  pub low_span_managers: Vec<SpanRow>,
  pub cost_per_level: Vec<LevelCost>,
  pub duplicate_roles: Vec<DuplicateRole>,
  pub cost_per_department: Vec<DepartmentCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomalies {
  pub low_span_managers: Vec<SpanRow>,
  pub departments_with_duplicate_roles: Vec<String>,
  pub level_mismatches: Vec<LevelMismatch>,
}

impl Anomalies {
  pub fn is_empty(&self) -> bool {
    self.low_span_managers.is_empty()
      && self.departments_with_duplicate_roles.is_empty()
      && self.level_mismatches.is_empty()
  }
}

// ---------------------------------------------------------------------------
// Presentation views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphViewNode {
  pub id: EmployeeId,
  pub label: String,
  /// Tooltip, "Role (Department)".
  pub title: String,
  pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
  pub from: EmployeeId,
  pub to: EmployeeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphView {
  pub nodes: Vec<GraphViewNode>,
  pub edges: Vec<GraphEdge>,
}

/// One rectangle of the Department → Role → Name treemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapEntry {
  pub path: Vec<String>,
  pub value: f64,
  /// Leaf entries only.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub level: Option<u32>,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
  /// Deterministic fingerprint of the canonical records.
  pub audit_id: String,
  pub metrics: MetricsPayload,
  pub anomalies: Anomalies,
  pub graph: GraphView,
  pub treemap: Vec<TreemapEntry>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub warnings: Vec<String>,
}

/// Structured error output for rejected tables.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub kind: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub row: Option<usize>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub ids: Vec<EmployeeId>,
}

impl ErrorOutput {
  pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      error: true,
      kind: kind.into(),
      message: message.into(),
      field: None,
      row: None,
      ids: Vec::new(),
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}

impl From<&crate::error::AuditError> for ErrorOutput {
  fn from(err: &crate::error::AuditError) -> Self {
    use crate::error::AuditError;

    let out = Self::new(err.kind(), err.to_string());
    match err {
      AuditError::Field { row, column, .. } => Self {
        row: Some(*row),
        ..out.with_field(column.clone())
      },
      AuditError::Integrity { ids, .. } => Self {
        ids: ids.clone(),
        ..out
      },
      AuditError::Schema { missing } => out.with_field(missing.join(", ")),
      AuditError::DuplicateColumn { column } => out.with_field(column.clone()),
      AuditError::Json(_) => out,
    }
  }
}

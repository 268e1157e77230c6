//! Audit configuration with sane defaults.

use serde::{Deserialize, Serialize};

/// How strictly `Level` is checked against the reporting chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelCheck {
  /// No check.
  Off,
  /// Mismatches are reported as anomalies.
  Warn,
  /// Any mismatch fails the audit with an integrity error.
  Strict,
}

/// Row order of the grouped output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableOrder {
  /// Order of first occurrence in the input table.
  FirstSeen,
  /// Total order: largest group first, ties broken by key.
  Ranked,
}

/// Which summarizer prompt variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
  /// Headline scalars only.
  Brief,
  /// Whole metrics payload as JSON.
  Full,
}

/// Tunable audit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditConfig {
  /// Managers with strictly fewer direct reports than this are flagged.
  pub min_span_threshold: u32,
  pub level_check: LevelCheck,
  pub table_order: TableOrder,
  pub prompt_style: PromptStyle,
}

impl Default for AuditConfig {
  fn default() -> Self {
    Self {
      min_span_threshold: 2,
      level_check: LevelCheck::Warn,
      table_order: TableOrder::FirstSeen,
      prompt_style: PromptStyle::Brief,
    }
  }
}

impl AuditConfig {
  /// Apply `ORG_AUDIT_*` overrides from a key lookup (usually `std::env::var`).
  ///
  /// Returns the offending variable name and value on a bad setting.
  pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, String>
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(v) = lookup("ORG_AUDIT_MIN_SPAN") {
      self.min_span_threshold = v
        .trim()
        .parse()
        .map_err(|_| format!("ORG_AUDIT_MIN_SPAN: expected a non-negative integer, got {:?}", v))?;
    }
    if let Some(v) = lookup("ORG_AUDIT_LEVEL_CHECK") {
      self.level_check = parse_choice(&v, "ORG_AUDIT_LEVEL_CHECK")?;
    }
    if let Some(v) = lookup("ORG_AUDIT_TABLE_ORDER") {
      self.table_order = parse_choice(&v, "ORG_AUDIT_TABLE_ORDER")?;
    }
    if let Some(v) = lookup("ORG_AUDIT_PROMPT_STYLE") {
      self.prompt_style = parse_choice(&v, "ORG_AUDIT_PROMPT_STYLE")?;
    }
    Ok(self)
  }
}

// Reuse the serde names so env values match config file values.
fn parse_choice<T: for<'de> Deserialize<'de>>(raw: &str, var: &str) -> Result<T, String> {
  serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
    .map_err(|_| format!("{}: unrecognized value {:?}", var, raw))
}

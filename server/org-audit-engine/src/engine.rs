//! Audit pipeline: normalize, validate, build the graph, compute metrics, classify.

use tracing::{debug, info};

use crate::anomaly;
use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::fingerprint;
use crate::graph::OrgGraph;
use crate::metrics;
use crate::normalize;
use crate::presentation;
use crate::summary;
use crate::types::*;

/// The audit engine. Holds configuration only; every run owns its artifacts.
#[derive(Debug, Clone, Default)]
pub struct Auditor {
  config: AuditConfig,
}

impl Auditor {
  pub fn new(config: AuditConfig) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(AuditConfig::default())
  }

  pub fn config(&self) -> &AuditConfig {
    &self.config
  }

  /// Audit one uploaded table.
  ///
  /// Schema, field and integrity errors are returned before any metric is computed.
  pub fn audit(&self, table: &InboundTable) -> Result<AuditReport, AuditError> {
    let records = normalize::normalize(table)?;
    debug!(rows = records.len(), "table normalized");

    let validated = crate::validate::validate(records, self.config.level_check)?;
    Ok(self.audit_validated(&validated))
  }

  /// Run the derived stages over an already-validated table.
  pub fn audit_validated(&self, validated: &ValidatedTable) -> AuditReport {
    let records = &validated.records;

    let graph = OrgGraph::build(records);
    let metrics = metrics::compute(records, &self.config);
    let anomalies = anomaly::classify(&metrics, validated);

    let mut warnings: Vec<String> = graph
      .skipped_edges()
      .iter()
      .map(|e| format!("skipped edge {} -> {}: manager not found", e.from, e.to))
      .collect();
    warnings.extend(validated.level_mismatches.iter().map(|m| {
      format!(
        "employee {} has level {}, expected {} under manager {}",
        m.id, m.level, m.expected_level, m.manager_id
      )
    }));

    let report = AuditReport {
      audit_id: fingerprint::compute(records),
      graph: presentation::graph_view(&graph),
      treemap: presentation::treemap(records),
      metrics,
      anomalies,
      warnings,
    };

    info!(
      audit_id = %report.audit_id,
      employees = report.metrics.employee_count,
      edges = graph.edge_count(),
      depth = report.metrics.organizational_depth,
      low_span = report.anomalies.low_span_managers.len(),
      duplicate_roles = report.metrics.duplicate_roles.len(),
      "audit complete"
    );
    report
  }

  /// Summarizer prompt for a finished report, in the configured style.
  pub fn prompt(&self, report: &AuditReport) -> String {
    summary::build_prompt(&report.metrics, self.config.prompt_style)
  }
}

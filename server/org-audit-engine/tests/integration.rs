//! Integration tests for the audit engine.

use org_audit_engine::types::ErrorOutput;
use org_audit_engine::{metrics, normalize, AuditConfig, AuditError, Auditor, InboundTable, OrgGraph};

fn fixture_table() -> InboundTable {
  let json = r#"[
    {"Employee ID": 1, "Name": "Ada", "Role": "CEO", "Department": "Exec", "Reports To": null, "Level": 0, "Cost": 300000, "Location": "London"},
    {"Employee ID": 2, "Name": "Bob", "Role": "VP Engineering", "Department": "Eng", "Reports To": 1, "Level": 1, "Cost": 200000},
    {"Employee ID": 3, "Name": "Cy", "Role": "VP Sales", "Department": "Sales", "Reports To": 1.0, "Level": 1, "Cost": 180000},
    {"Employee ID": 4, "Name": "Dee", "Role": "Engineer", "Department": "Eng", "Reports To": "2", "Level": 2, "Cost": 120000},
    {"Employee ID": 5, "Name": "Eve", "Role": "Engineer", "Department": "Eng", "Reports To": 2, "Level": 2, "Cost": 125000},
    {"Employee ID": 6, "Name": "Fay", "Role": "Engineer", "Department": "Eng", "Reports To": 2, "Level": 2, "Cost": 118000.5},
    {"Employee ID": 7, "Name": "Gus", "Role": "Account Exec", "Department": "Sales", "Reports To": 3, "Level": 2, "Cost": 90000},
    {"Employee ID": 8, "Name": "Hal", "Role": "Intern", "Department": "Eng", "Reports To": 4, "Level": 3, "Cost": 30000}
  ]"#;
  serde_json::from_str(json).unwrap()
}

fn table_from(records: &str) -> InboundTable {
  serde_json::from_str(records).unwrap()
}

#[test]
fn fixture_produces_full_report() {
  let report = Auditor::with_defaults().audit(&fixture_table()).unwrap();

  assert!(report.audit_id.starts_with("org-"));
  assert_eq!(report.metrics.employee_count, 8);
  assert_eq!(report.metrics.department_count, 3);
  assert_eq!(report.metrics.organizational_depth, 3);

  // Span rows in first-seen order of the manager reference.
  let span: Vec<(&str, u32)> = report
    .metrics
    .span_of_control
    .iter()
    .map(|s| (s.manager_id.as_str(), s.direct_reports))
    .collect();
  assert_eq!(span, vec![("1", 2), ("2", 3), ("3", 1), ("4", 1)]);
  assert_eq!(report.metrics.span_of_control[1].manager_name.as_deref(), Some("Bob"));

  let low: Vec<&str> = report.anomalies.low_span_managers.iter().map(|s| s.manager_id.as_str()).collect();
  assert_eq!(low, vec!["3", "4"]);
  assert_eq!(report.anomalies.departments_with_duplicate_roles, vec!["Eng"]);
  assert!(report.anomalies.level_mismatches.is_empty());
  assert!(report.warnings.is_empty());
}

#[test]
fn graph_counts_match_records() {
  let records = normalize::normalize(&fixture_table()).unwrap();
  let with_manager = records.iter().filter(|r| r.manager.is_some()).count();
  let graph = OrgGraph::build(&records);
  assert_eq!(graph.node_count(), records.len());
  assert_eq!(graph.edge_count(), with_manager);
  assert!(graph.skipped_edges().is_empty());
}

#[test]
fn cost_per_level_conserves_total_cost() {
  let records = normalize::normalize(&fixture_table()).unwrap();
  let by_level: f64 = metrics::cost_per_level(&records).iter().map(|l| l.total_cost).sum();
  let total: f64 = records.iter().map(|r| r.cost).sum();
  assert!((by_level - total).abs() < 1e-6);

  let levels: Vec<u32> = metrics::cost_per_level(&records).iter().map(|l| l.level).collect();
  assert_eq!(levels, vec![0, 1, 2, 3]);
}

#[test]
fn each_manager_appears_once_in_span_table() {
  let records = normalize::normalize(&fixture_table()).unwrap();
  let span = metrics::span_of_control(&records);
  for record in &records {
    let rows = span.iter().filter(|s| s.manager_id == record.id).count();
    assert!(rows <= 1, "manager {} listed {} times", record.id, rows);
  }
}

#[test]
fn duplicate_roles_match_shared_pairs() {
  let table = table_from(
    r#"[
      {"Employee ID": 1, "Name": "A", "Role": "Engineer", "Department": "Eng", "Reports To": null, "Level": 0, "Cost": 1},
      {"Employee ID": 2, "Name": "B", "Role": "Engineer", "Department": "Eng", "Reports To": null, "Level": 0, "Cost": 1},
      {"Employee ID": 3, "Name": "C", "Role": "Rep", "Department": "Sales", "Reports To": null, "Level": 0, "Cost": 1}
    ]"#,
  );
  let report = Auditor::with_defaults().audit(&table).unwrap();
  let dups: Vec<(&str, &str, u32)> = report
    .metrics
    .duplicate_roles
    .iter()
    .map(|d| (d.department.as_str(), d.role.as_str(), d.count))
    .collect();
  assert_eq!(dups, vec![("Eng", "Engineer", 2)]);
}

#[test]
fn empty_table_has_zero_depth() {
  let report = Auditor::with_defaults().audit(&table_from("[]")).unwrap();
  assert_eq!(report.metrics.organizational_depth, 0);
  assert_eq!(report.metrics.employee_count, 0);
  assert!(report.graph.nodes.is_empty());
  assert!(report.treemap.is_empty());
}

#[test]
fn root_with_two_reports() {
  let table = table_from(
    r#"{"columns": ["Employee ID", "Name", "Role", "Department", "Reports To", "Level", "Cost"],
        "rows": [
          [1, "A", "Lead", "Ops", null, 0, 100],
          [2, "B", "Clerk", "Ops", 1, 1, 50],
          [3, "C", "Clerk", "Ops", 1, 1, 50]
        ]}"#,
  );
  let report = Auditor::with_defaults().audit(&table).unwrap();
  assert_eq!(report.metrics.span_of_control.len(), 1);
  assert_eq!(report.metrics.span_of_control[0].direct_reports, 2);
  assert_eq!(report.metrics.organizational_depth, 1);
  assert_eq!(report.metrics.cost_per_level.len(), 2);
}

#[test]
fn dangling_manager_is_an_integrity_error() {
  let table = table_from(
    r#"[
      {"Employee ID": 1, "Name": "A", "Role": "Lead", "Department": "Ops", "Reports To": null, "Level": 0, "Cost": 1},
      {"Employee ID": 2, "Name": "B", "Role": "Clerk", "Department": "Ops", "Reports To": 99, "Level": 1, "Cost": 1}
    ]"#,
  );
  let err = Auditor::with_defaults().audit(&table).unwrap_err();
  assert!(matches!(err, AuditError::Integrity { .. }));

  let out = serde_json::to_value(ErrorOutput::from(&err)).unwrap();
  assert_eq!(out["kind"], "integrity");
  assert_eq!(out["ids"], serde_json::json!(["2"]));
}

#[test]
fn missing_columns_fail_before_computation() {
  let table = table_from(r#"[{"Employee ID": 1, "Name": "A"}]"#);
  let err = Auditor::with_defaults().audit(&table).unwrap_err();
  assert!(matches!(err, AuditError::Schema { .. }));
  assert!(err.to_string().contains("Reports To"), "Error should name the column: {}", err);
}

#[test]
fn metrics_are_byte_identical_across_runs() {
  let records = normalize::normalize(&fixture_table()).unwrap();
  let config = AuditConfig::default();
  let first = serde_json::to_string(&metrics::compute(&records, &config)).unwrap();
  let second = serde_json::to_string(&metrics::compute(&records, &config)).unwrap();
  assert_eq!(first, second);

  let a = serde_json::to_string(&Auditor::with_defaults().audit(&fixture_table()).unwrap()).unwrap();
  let b = serde_json::to_string(&Auditor::with_defaults().audit(&fixture_table()).unwrap()).unwrap();
  assert_eq!(a, b, "Same inputs must produce identical JSON output");
}

#[test]
fn extra_columns_pass_through() {
  let records = normalize::normalize(&fixture_table()).unwrap();
  assert_eq!(records[0].extra.get("Location"), Some(&serde_json::json!("London")));
  assert!(records[1].extra.is_empty());
}

#[test]
fn prompt_reflects_report() {
  let auditor = Auditor::with_defaults();
  let report = auditor.audit(&fixture_table()).unwrap();
  let prompt = auditor.prompt(&report);
  assert!(prompt.contains("Employees: 8"));
  assert!(prompt.contains("Organizational depth: 3"));
}

#[test]
fn long_numeric_ids_resolve_across_cell_types() {
  let table = table_from(
    r#"[
      {"Employee ID": 9007199254740993, "Name": "A", "Role": "Lead", "Department": "Ops", "Reports To": null, "Level": 0, "Cost": 1},
      {"Employee ID": 2, "Name": "B", "Role": "Clerk", "Department": "Ops", "Reports To": "9007199254740993", "Level": 1, "Cost": 1}
    ]"#,
  );
  let report = Auditor::with_defaults().audit(&table).unwrap();
  assert_eq!(report.metrics.span_of_control[0].manager_id.as_str(), "9007199254740993");
  assert_eq!(report.metrics.span_of_control[0].manager_name.as_deref(), Some("A"));
}

#[test]
fn distinct_long_string_ids_are_not_duplicates() {
  let table = table_from(
    r#"[
      {"Employee ID": "12345678901234567890", "Name": "A", "Role": "Lead", "Department": "Ops", "Reports To": null, "Level": 0, "Cost": 1},
      {"Employee ID": "12345678901234567891", "Name": "B", "Role": "Clerk", "Department": "Ops", "Reports To": "12345678901234567890", "Level": 1, "Cost": 1}
    ]"#,
  );
  let report = Auditor::with_defaults().audit(&table).unwrap();
  assert_eq!(report.metrics.employee_count, 2);
  assert_eq!(report.graph.edges.len(), 1);
}

#[test]
fn malformed_table_message_names_the_problem() {
  let err = serde_json::from_str::<InboundTable>(r#"{"columns": ["Employee ID"]}"#).map_err(AuditError::from).unwrap_err();
  let out = ErrorOutput::from(&err);
  assert_eq!(out.kind, "json");
  assert!(out.message.contains("missing field `rows`"), "unhelpful message: {}", out.message);
}

//! Anomaly classification: narrow spans, duplicated roles, level drift.

use crate::types::*;

/// Managers whose direct-report count is strictly below `min_span_threshold`.
pub fn low_span_managers(span: &[SpanRow], min_span_threshold: u32) -> Vec<SpanRow> {
  span
    .iter()
    .filter(|row| row.direct_reports < min_span_threshold)
    .cloned()
    .collect()
}

/// Departments that hold at least one duplicated role title, first-seen order.
pub fn departments_with_duplicate_roles(duplicates: &[DuplicateRole]) -> Vec<String> {
  let mut departments: Vec<String> = Vec::new();
  for dup in duplicates {
    if !departments.contains(&dup.department) {
      departments.push(dup.department.clone());
    }
  }
  departments
}

pub fn classify(payload: &MetricsPayload, validated: &ValidatedTable) -> Anomalies {
  Anomalies {
    low_span_managers: payload.low_span_managers.clone(),
    departments_with_duplicate_roles: departments_with_duplicate_roles(&payload.duplicate_roles),
    level_mismatches: validated.level_mismatches.clone(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn span(id: &str, reports: u32) -> SpanRow {
    SpanRow {
      manager_id: EmployeeId::new(id),
      manager_name: Some(format!("emp-{}", id)),
      direct_reports: reports,
    }
  }

  #[test]
  fn threshold_is_strict() {
    let rows = vec![span("1", 1), span("2", 2), span("3", 5)];
    let flagged: Vec<String> = low_span_managers(&rows, 2).iter().map(|r| r.manager_id.to_string()).collect();
    assert_eq!(flagged, vec!["1"]);
    assert_eq!(low_span_managers(&rows, 3).len(), 2);
    assert!(low_span_managers(&rows, 0).is_empty());
  }

  #[test]
  fn departments_are_listed_once() {
    let dup = |d: &str, r: &str| DuplicateRole {
      department: d.into(),
      role: r.into(),
      count: 2,
    };
    let depts = departments_with_duplicate_roles(&[dup("Eng", "Engineer"), dup("Sales", "Rep"), dup("Eng", "QA")]);
    assert_eq!(depts, vec!["Eng", "Sales"]);
  }
}

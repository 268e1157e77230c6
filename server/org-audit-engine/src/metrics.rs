//! Structural metrics over a validated record set.
//!
//! Every function here is total: an empty table yields empty tables and zero scalars.
//! Grouped tables keep the order in which each key first appears in the input.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use crate::anomaly;
use crate::config::{AuditConfig, TableOrder};
use crate::types::*;

/// Direct-report count per manager, joined with the manager's name.
///
/// Managers without reports are absent.
pub fn span_of_control(records: &[EmployeeRecord]) -> Vec<SpanRow> {
  let names: HashMap<&EmployeeId, &str> = records.iter().map(|r| (&r.id, r.name.as_str())).collect();

  let counts = count_first_seen(records.iter().filter_map(|r| r.manager.as_ref()));
  counts
    .into_iter()
    .map(|(manager, direct_reports)| SpanRow {
      manager_id: manager.clone(),
      manager_name: names.get(manager).map(|n| n.to_string()),
      direct_reports,
    })
    .collect()
}

/// Maximum `Level` across the table, 0 when empty.
pub fn organizational_depth(records: &[EmployeeRecord]) -> u32 {
  records.iter().map(|r| r.level).max().unwrap_or(0)
}

/// Total cost per level, ascending by level.
pub fn cost_per_level(records: &[EmployeeRecord]) -> Vec<LevelCost> {
  let mut levels: BTreeMap<u32, (u32, f64)> = BTreeMap::new();
  for record in records {
    let entry = levels.entry(record.level).or_insert((0, 0.0));
    entry.0 += 1;
    entry.1 += record.cost;
  }
  levels
    .into_iter()
    .map(|(level, (headcount, total_cost))| LevelCost {
      level,
      headcount,
      total_cost,
    })
    .collect()
}

/// (department, role) pairs held by more than one employee.
pub fn duplicate_roles(records: &[EmployeeRecord]) -> Vec<DuplicateRole> {
  count_first_seen(records.iter().map(|r| (r.department.as_str(), r.role.as_str())))
    .into_iter()
    .filter(|(_, count)| *count > 1)
    .map(|((department, role), count)| DuplicateRole {
      department: department.to_string(),
      role: role.to_string(),
      count,
    })
    .collect()
}

/// Headcount and total cost per department.
pub fn cost_per_department(records: &[EmployeeRecord]) -> Vec<DepartmentCost> {
  let mut rows: Vec<DepartmentCost> = Vec::new();
  let mut index: HashMap<&str, usize> = HashMap::new();
  for record in records {
    let i = *index.entry(record.department.as_str()).or_insert_with(|| {
      rows.push(DepartmentCost {
        department: record.department.clone(),
        headcount: 0,
        total_cost: 0.0,
      });
      rows.len() - 1
    });
    rows[i].headcount += 1;
    rows[i].total_cost += record.cost;
  }
  rows
}

/// Assemble the full payload for one audit run.
pub fn compute(records: &[EmployeeRecord], config: &AuditConfig) -> MetricsPayload {
  let mut span = span_of_control(records);
  let mut duplicates = duplicate_roles(records);
  let mut departments = cost_per_department(records);

  if config.table_order == TableOrder::Ranked {
    span.sort_by(|a, b| {
      b.direct_reports
        .cmp(&a.direct_reports)
        .then_with(|| a.manager_id.natural_cmp(&b.manager_id))
    });
    duplicates.sort_by(|a, b| {
      b.count
        .cmp(&a.count)
        .then_with(|| a.department.cmp(&b.department))
        .then_with(|| a.role.cmp(&b.role))
    });
    departments.sort_by(|a, b| {
      b.total_cost
        .total_cmp(&a.total_cost)
        .then_with(|| a.department.cmp(&b.department))
    });
  }

  let total_reports: u32 = span.iter().map(|s| s.direct_reports).sum();
  let mean_span_of_control = if span.is_empty() {
    0.0
  } else {
    total_reports as f64 / span.len() as f64
  };

  let department_count = records.iter().map(|r| r.department.as_str()).collect::<HashSet<_>>().len();

  MetricsPayload {
    employee_count: records.len(),
    department_count,
    manager_count: span.len(),
    mean_span_of_control,
    organizational_depth: organizational_depth(records),
    total_cost: records.iter().map(|r| r.cost).sum(),
    low_span_managers: anomaly::low_span_managers(&span, config.min_span_threshold),
    span_of_control: span,
    cost_per_level: cost_per_level(records),
    duplicate_roles: duplicates,
    cost_per_department: departments,
  }
}

/// Count occurrences per key, keyed in order of first appearance.
fn count_first_seen<K: Eq + Hash + Copy>(keys: impl Iterator<Item = K>) -> Vec<(K, u32)> {
  let mut counts: Vec<(K, u32)> = Vec::new();
  let mut index: HashMap<K, usize> = HashMap::new();
  for key in keys {
    match index.get(&key) {
      Some(&i) => counts[i].1 += 1,
      None => {
        index.insert(key, counts.len());
        counts.push((key, 1));
      }
    }
  }
  counts
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rec(id: &str, manager: Option<&str>, level: u32, dept: &str, role: &str, cost: f64) -> EmployeeRecord {
    EmployeeRecord {
      id: EmployeeId::new(id),
      name: format!("emp-{}", id),
      role: role.into(),
      department: dept.into(),
      manager: manager.map(EmployeeId::new),
      level,
      cost,
      extra: Default::default(),
    }
  }

  fn three_person_team() -> Vec<EmployeeRecord> {
    vec![
      rec("1", None, 0, "Exec", "CEO", 300.0),
      rec("2", Some("1"), 1, "Eng", "Engineer", 120.0),
      rec("3", Some("1"), 1, "Eng", "Engineer", 110.0),
    ]
  }

  #[test]
  fn span_depth_and_levels_for_small_team() {
    let records = three_person_team();
    let span = span_of_control(&records);
    assert_eq!(
      span,
      vec![SpanRow {
        manager_id: EmployeeId::new("1"),
        manager_name: Some("emp-1".into()),
        direct_reports: 2,
      }]
    );
    assert_eq!(organizational_depth(&records), 1);

    let levels = cost_per_level(&records);
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].level, 0);
    assert_eq!(levels[1].headcount, 2);
    assert!((levels[1].total_cost - 230.0).abs() < 1e-9);
  }

  #[test]
  fn empty_table_is_total() {
    let payload = compute(&[], &AuditConfig::default());
    assert_eq!(payload.employee_count, 0);
    assert_eq!(payload.organizational_depth, 0);
    assert_eq!(payload.mean_span_of_control, 0.0);
    assert_eq!(payload.total_cost, 0.0);
    assert!(payload.span_of_control.is_empty());
    assert!(payload.cost_per_level.is_empty());
    assert!(payload.duplicate_roles.is_empty());
  }

  #[test]
  fn duplicate_roles_only_pairs_above_one() {
    let records = vec![
      rec("1", None, 0, "Eng", "Engineer", 1.0),
      rec("2", None, 0, "Eng", "Engineer", 1.0),
      rec("3", None, 0, "Sales", "Rep", 1.0),
      rec("4", None, 0, "Sales", "Engineer", 1.0),
    ];
    assert_eq!(
      duplicate_roles(&records),
      vec![DuplicateRole {
        department: "Eng".into(),
        role: "Engineer".into(),
        count: 2,
      }]
    );
  }

  #[test]
  fn grouping_keeps_first_seen_order_unless_ranked() {
    let records = vec![
      rec("1", None, 0, "Exec", "CEO", 10.0),
      rec("2", None, 0, "Ops", "Lead", 10.0),
      rec("3", Some("2"), 1, "Ops", "Clerk", 10.0),
      rec("4", Some("1"), 1, "Exec", "Aide", 10.0),
      rec("5", Some("1"), 1, "Exec", "Aide", 10.0),
    ];

    let first_seen = compute(&records, &AuditConfig::default());
    let order: Vec<&str> = first_seen.span_of_control.iter().map(|s| s.manager_id.as_str()).collect();
    assert_eq!(order, vec!["2", "1"]);

    let ranked = compute(
      &records,
      &AuditConfig {
        table_order: TableOrder::Ranked,
        ..AuditConfig::default()
      },
    );
    let order: Vec<&str> = ranked.span_of_control.iter().map(|s| s.manager_id.as_str()).collect();
    assert_eq!(order, vec!["1", "2"]);
    assert_eq!(ranked.cost_per_department[0].department, "Exec");
  }

  #[test]
  fn ranked_span_ties_break_on_numeric_id() {
    let records = vec![
      rec("10", None, 0, "Ops", "Lead", 1.0),
      rec("9", None, 0, "Ops", "Lead", 1.0),
      rec("11", Some("10"), 1, "Ops", "Clerk", 1.0),
      rec("12", Some("9"), 1, "Ops", "Clerk", 1.0),
    ];
    let ranked = compute(
      &records,
      &AuditConfig {
        table_order: TableOrder::Ranked,
        ..AuditConfig::default()
      },
    );
    let order: Vec<&str> = ranked.span_of_control.iter().map(|s| s.manager_id.as_str()).collect();
    assert_eq!(order, vec!["9", "10"]);
  }

  #[test]
  fn payload_scalars() {
    let mut records = three_person_team();
    records.push(rec("4", Some("2"), 2, "Eng", "Intern", 20.0));
    let payload = compute(&records, &AuditConfig::default());
    assert_eq!(payload.employee_count, 4);
    assert_eq!(payload.department_count, 2);
    assert_eq!(payload.manager_count, 2);
    assert!((payload.mean_span_of_control - 1.5).abs() < 1e-9);
    assert!((payload.total_cost - 550.0).abs() < 1e-9);
    // Manager 2 has a single report, below the default threshold of 2.
    assert_eq!(payload.low_span_managers.len(), 1);
    assert_eq!(payload.low_span_managers[0].manager_id, EmployeeId::new("2"));
  }
}

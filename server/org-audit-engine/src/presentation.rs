//! Render-ready views for the presentation layer: node/edge graph and cost treemap.

use std::collections::HashMap;

use crate::graph::OrgGraph;
use crate::types::*;

pub fn graph_view(graph: &OrgGraph) -> GraphView {
  GraphView {
    nodes: graph
      .nodes()
      .iter()
      .map(|n| GraphViewNode {
        id: n.id.clone(),
        label: n.name.clone(),
        title: format!("{} ({})", n.role, n.department),
        level: n.level,
      })
      .collect(),
    edges: graph.edges().to_vec(),
  }
}

/// Department → Role → Name rectangles sized by cost.
///
/// Parent entries (department, department/role) carry the sum of their children and
/// precede them; leaves carry the employee's level for coloring.
pub fn treemap(records: &[EmployeeRecord]) -> Vec<TreemapEntry> {
  let mut entries: Vec<TreemapEntry> = Vec::new();
  let mut parents: HashMap<Vec<String>, usize> = HashMap::new();

  for record in records {
    let dept_path = vec![record.department.clone()];
    let role_path = vec![record.department.clone(), record.role.clone()];

    for path in [dept_path, role_path] {
      let i = *parents.entry(path.clone()).or_insert_with(|| {
        entries.push(TreemapEntry {
          path,
          value: 0.0,
          level: None,
        });
        entries.len() - 1
      });
      entries[i].value += record.cost;
    }

    entries.push(TreemapEntry {
      path: vec![record.department.clone(), record.role.clone(), record.name.clone()],
      value: record.cost,
      level: Some(record.level),
    });
  }

  entries
}

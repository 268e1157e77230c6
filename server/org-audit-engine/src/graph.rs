//! Directed reporting graph: one node per employee, edges manager -> direct report.

use std::collections::HashMap;

use tracing::warn;

use crate::types::{EmployeeId, EmployeeRecord, GraphEdge};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgNode {
  pub id: EmployeeId,
  pub name: String,
  pub role: String,
  pub department: String,
  pub level: u32,
}

/// Read-only view built once per audit run.
#[derive(Debug, Clone)]
pub struct OrgGraph {
  nodes: Vec<OrgNode>,
  index: HashMap<EmployeeId, usize>,
  /// Direct reports per node, in input order.
  children: Vec<Vec<usize>>,
  parent: Vec<Option<usize>>,
  edges: Vec<GraphEdge>,
  skipped_edges: Vec<GraphEdge>,
}

impl OrgGraph {
  /// Build the graph from records.
  ///
  /// Identifiers are compared in canonical form. Edges pointing at a manager that is not
  /// in `records` are skipped with a warning and kept in `skipped_edges`.
  pub fn build(records: &[EmployeeRecord]) -> Self {
    let mut nodes = Vec::with_capacity(records.len());
    let mut index = HashMap::with_capacity(records.len());

    for record in records {
      index.entry(record.id.clone()).or_insert(nodes.len());
      nodes.push(OrgNode {
        id: record.id.clone(),
        name: record.name.clone(),
        role: record.role.clone(),
        department: record.department.clone(),
        level: record.level,
      });
    }

    let mut children = vec![Vec::new(); nodes.len()];
    let mut parent = vec![None; nodes.len()];
    let mut edges = Vec::new();
    let mut skipped_edges = Vec::new();

    for (i, record) in records.iter().enumerate() {
      let Some(manager) = &record.manager else {
        continue;
      };
      let edge = GraphEdge {
        from: manager.clone(),
        to: record.id.clone(),
      };
      match index.get(manager) {
        Some(&m) => {
          children[m].push(i);
          parent[i] = Some(m);
          edges.push(edge);
        }
        None => {
          warn!(employee = %record.id, manager = %manager, "skipping edge to unknown manager");
          skipped_edges.push(edge);
        }
      }
    }

    Self {
      nodes,
      index,
      children,
      parent,
      edges,
      skipped_edges,
    }
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub fn nodes(&self) -> &[OrgNode] {
    &self.nodes
  }

  pub fn edges(&self) -> &[GraphEdge] {
    &self.edges
  }

  pub fn skipped_edges(&self) -> &[GraphEdge] {
    &self.skipped_edges
  }

  pub fn node(&self, id: &EmployeeId) -> Option<&OrgNode> {
    self.index.get(id).map(|&i| &self.nodes[i])
  }

  /// Nodes without a resolved manager.
  pub fn roots(&self) -> Vec<&OrgNode> {
    self
      .parent
      .iter()
      .enumerate()
      .filter(|(_, p)| p.is_none())
      .map(|(i, _)| &self.nodes[i])
      .collect()
  }

  pub fn direct_reports(&self, id: &EmployeeId) -> Vec<&OrgNode> {
    match self.index.get(id) {
      Some(&i) => self.children[i].iter().map(|&c| &self.nodes[c]).collect(),
      None => Vec::new(),
    }
  }

  pub fn manager_of(&self, id: &EmployeeId) -> Option<&OrgNode> {
    let i = *self.index.get(id)?;
    self.parent[i].map(|p| &self.nodes[p])
  }

  /// Managers above `id`, nearest first.
  pub fn chain_of_command(&self, id: &EmployeeId) -> Vec<&OrgNode> {
    let mut chain = Vec::new();
    let mut cur = self.index.get(id).and_then(|&i| self.parent[i]);
    while let Some(p) = cur {
      // Guard against cycles when built from unvalidated input.
      if chain.len() > self.nodes.len() {
        break;
      }
      chain.push(&self.nodes[p]);
      cur = self.parent[p];
    }
    chain
  }

  /// Number of employees under `id`, directly or indirectly.
  pub fn subtree_size(&self, id: &EmployeeId) -> usize {
    let Some(&start) = self.index.get(id) else {
      return 0;
    };
    let mut visited = vec![false; self.nodes.len()];
    visited[start] = true;
    let mut stack: Vec<usize> = self.children[start].clone();
    let mut count = 0;
    while let Some(i) = stack.pop() {
      if visited[i] {
        continue;
      }
      visited[i] = true;
      count += 1;
      stack.extend(self.children[i].iter().copied());
    }
    count
  }

  /// Longest root-to-leaf chain counted in edges. 0 for empty or edgeless graphs.
  pub fn structural_depth(&self) -> u32 {
    let mut depth = 0;
    let mut frontier: Vec<usize> = (0..self.nodes.len()).filter(|&i| self.parent[i].is_none()).collect();
    let mut visited = vec![false; self.nodes.len()];
    for &i in &frontier {
      visited[i] = true;
    }

    loop {
      let next: Vec<usize> = frontier
        .iter()
        .flat_map(|&i| self.children[i].iter().copied())
        .filter(|&c| !visited[c])
        .collect();
      if next.is_empty() {
        return depth;
      }
      for &c in &next {
        visited[c] = true;
      }
      depth += 1;
      frontier = next;
    }
  }
}

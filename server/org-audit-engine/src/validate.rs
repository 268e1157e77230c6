//! Referential integrity: unique ids, resolvable managers, no cycles, level consistency.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::LevelCheck;
use crate::error::AuditError;
use crate::types::*;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
  Unseen,
  OnPath,
  Done,
}

/// Validate canonical records and hand them back as a `ValidatedTable`.
pub fn validate(records: Vec<EmployeeRecord>, level_check: LevelCheck) -> Result<ValidatedTable, AuditError> {
  let index = index_unique(&records)?;

  let self_refs: Vec<EmployeeId> = records
    .iter()
    .filter(|r| r.manager.as_ref() == Some(&r.id))
    .map(|r| r.id.clone())
    .collect();
  if !self_refs.is_empty() {
    return Err(AuditError::integrity(self_refs, "employee reports to itself"));
  }

  let dangling: Vec<EmployeeId> = records
    .iter()
    .filter(|r| matches!(&r.manager, Some(m) if !index.contains_key(m)))
    .map(|r| r.id.clone())
    .collect();
  if !dangling.is_empty() {
    return Err(AuditError::integrity(dangling, "dangling manager reference"));
  }

  let managers: Vec<Option<usize>> = records
    .iter()
    .map(|r| r.manager.as_ref().and_then(|m| index.get(m).copied()))
    .collect();
  if let Some(cycle) = find_cycle(&managers) {
    let ids = cycle.into_iter().map(|i| records[i].id.clone()).collect();
    return Err(AuditError::integrity(ids, "reporting cycle"));
  }

  let level_mismatches = match level_check {
    LevelCheck::Off => Vec::new(),
    LevelCheck::Warn | LevelCheck::Strict => level_mismatches(&records, &managers),
  };
  if !level_mismatches.is_empty() {
    if level_check == LevelCheck::Strict {
      let ids = level_mismatches.iter().map(|m| m.id.clone()).collect();
      return Err(AuditError::integrity(ids, "level inconsistent with reporting chain"));
    }
    warn!(count = level_mismatches.len(), "level values disagree with reporting chain");
  }

  debug!(records = records.len(), "integrity checks passed");
  Ok(ValidatedTable {
    records,
    level_mismatches,
  })
}

fn index_unique(records: &[EmployeeRecord]) -> Result<HashMap<EmployeeId, usize>, AuditError> {
  let mut index = HashMap::with_capacity(records.len());
  let mut duplicates = Vec::new();
  let mut reported = HashSet::new();

  for (i, record) in records.iter().enumerate() {
    if index.insert(record.id.clone(), i).is_some() && reported.insert(record.id.clone()) {
      duplicates.push(record.id.clone());
    }
  }

  if duplicates.is_empty() {
    Ok(index)
  } else {
    Err(AuditError::integrity(duplicates, "duplicate identifier"))
  }
}

/// First cycle found following manager links, as record indices in chain order.
fn find_cycle(managers: &[Option<usize>]) -> Option<Vec<usize>> {
  let mut state = vec![Visit::Unseen; managers.len()];

  for start in 0..managers.len() {
    let mut path = Vec::new();
    let mut cur = Some(start);

    while let Some(i) = cur {
      match state[i] {
        Visit::Done => break,
        Visit::OnPath => {
          let pos = path.iter().position(|&p| p == i).unwrap_or(0);
          return Some(path[pos..].to_vec());
        }
        Visit::Unseen => {
          state[i] = Visit::OnPath;
          path.push(i);
          cur = managers[i];
        }
      }
    }

    for i in path {
      state[i] = Visit::Done;
    }
  }

  None
}

fn level_mismatches(records: &[EmployeeRecord], managers: &[Option<usize>]) -> Vec<LevelMismatch> {
  records
    .iter()
    .zip(managers)
    .filter_map(|(record, manager)| {
      let manager = &records[(*manager)?];
      let expected_level = manager.level.saturating_add(1);
      (record.level != expected_level).then(|| LevelMismatch {
        id: record.id.clone(),
        manager_id: manager.id.clone(),
        level: record.level,
        expected_level,
      })
    })
    .collect()
}

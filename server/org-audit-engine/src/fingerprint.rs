//! Stable fingerprint of a canonical record set, used as the audit id.

use crate::types::EmployeeRecord;

/// Compute `org-<16 hex>` from the canonical records, in table order.
///
/// Covers the audited fields only; pass-through columns do not change the id.
pub fn compute(records: &[EmployeeRecord]) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(&(records.len() as u64).to_le_bytes());
  for r in records {
    field(&mut hasher, r.id.as_str());
    field(&mut hasher, &r.name);
    field(&mut hasher, &r.role);
    field(&mut hasher, &r.department);
    match &r.manager {
      Some(m) => {
        hasher.update(&[1u8]);
        field(&mut hasher, m.as_str());
      }
      None => {
        hasher.update(&[0u8]);
      }
    }
    hasher.update(&r.level.to_le_bytes());
    hasher.update(&r.cost.to_bits().to_le_bytes());
  }
  let hex = hasher.finalize().to_hex();
  format!("org-{}", &hex[..16])
}

/// Length-prefixed so adjacent fields cannot run into each other.
fn field(hasher: &mut blake3::Hasher, s: &str) {
  hasher.update(&(s.len() as u64).to_le_bytes());
  hasher.update(s.as_bytes());
}

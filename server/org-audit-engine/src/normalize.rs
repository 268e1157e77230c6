//! Schema mapping: inbound table rows into canonical `EmployeeRecord`s.

use serde_json::{Map, Value};

use crate::error::AuditError;
use crate::types::*;

pub const EMPLOYEE_ID: &str = "Employee ID";
pub const NAME: &str = "Name";
pub const ROLE: &str = "Role";
pub const DEPARTMENT: &str = "Department";
pub const REPORTS_TO: &str = "Reports To";
pub const LEVEL: &str = "Level";
pub const COST: &str = "Cost";

/// Required columns, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 7] = [EMPLOYEE_ID, NAME, ROLE, DEPARTMENT, REPORTS_TO, LEVEL, COST];

/// Column names present in the table: the header for columnar input, the union of row
/// keys (first-seen order) for record input.
pub fn column_set(table: &InboundTable) -> Vec<String> {
  match table {
    InboundTable::Columnar { columns, .. } => columns.clone(),
    InboundTable::Records(rows) => {
      let mut seen: Vec<String> = Vec::new();
      for row in rows {
        for key in row.keys() {
          if !seen.iter().any(|k| k == key) {
            seen.push(key.clone());
          }
        }
      }
      seen
    }
  }
}

/// Fail with a schema error naming every required column that is absent.
///
/// A record-form table with no rows has no column set and passes. A columnar header
/// that names a column twice is rejected.
pub fn check_schema(table: &InboundTable) -> Result<(), AuditError> {
  match table {
    InboundTable::Records(rows) if rows.is_empty() => return Ok(()),
    InboundTable::Columnar { columns, .. } => {
      for (i, column) in columns.iter().enumerate() {
        if columns[..i].contains(column) {
          return Err(AuditError::duplicate_column(column));
        }
      }
    }
    InboundTable::Records(_) => {}
  }

  let columns = column_set(table);
  let missing: Vec<String> = REQUIRED_COLUMNS
    .iter()
    .filter(|required| !columns.iter().any(|c| c == *required))
    .map(|c| c.to_string())
    .collect();

  if missing.is_empty() {
    Ok(())
  } else {
    Err(AuditError::schema(missing))
  }
}

/// Check the schema, then map every row into a typed record.
pub fn normalize(table: &InboundTable) -> Result<Vec<EmployeeRecord>, AuditError> {
  check_schema(table)?;

  match table {
    InboundTable::Records(rows) => rows
      .iter()
      .enumerate()
      .map(|(i, row)| map_row(i + 1, row))
      .collect(),
    InboundTable::Columnar { columns, rows } => rows
      .iter()
      .enumerate()
      .map(|(i, cells)| {
        let row_no = i + 1;
        if cells.len() != columns.len() {
          return Err(AuditError::field(
            row_no,
            "rows",
            format!("expected {} cells, found {}", columns.len(), cells.len()),
          ));
        }
        let row: RawRow = columns.iter().cloned().zip(cells.iter().cloned()).collect();
        map_row(row_no, &row)
      })
      .collect(),
  }
}

static NULL: Value = Value::Null;

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a Value {
  row.get(column).unwrap_or(&NULL)
}

fn map_row(row_no: usize, row: &RawRow) -> Result<EmployeeRecord, AuditError> {
  let id = canonical_id(cell(row, EMPLOYEE_ID))
    .map_err(|reason| AuditError::field(row_no, EMPLOYEE_ID, reason))?
    .ok_or_else(|| AuditError::field(row_no, EMPLOYEE_ID, "must not be empty"))?;

  let manager =
    canonical_id(cell(row, REPORTS_TO)).map_err(|reason| AuditError::field(row_no, REPORTS_TO, reason))?;

  let text = |column: &str| {
    text_cell(cell(row, column)).map_err(|reason| AuditError::field(row_no, column, reason))
  };
  let name = text(NAME)?;
  let role = text(ROLE)?;
  let department = text(DEPARTMENT)?;

  let level = level_cell(cell(row, LEVEL)).map_err(|reason| AuditError::field(row_no, LEVEL, reason))?;
  let cost = cost_cell(cell(row, COST)).map_err(|reason| AuditError::field(row_no, COST, reason))?;

  let extra: Map<String, Value> = row
    .iter()
    .filter(|(k, _)| !REQUIRED_COLUMNS.contains(&k.as_str()))
    .map(|(k, v)| (k.clone(), v.clone()))
    .collect();

  Ok(EmployeeRecord {
    id,
    name,
    role,
    department,
    manager,
    level,
    cost,
    extra,
  })
}

/// Canonicalize an identifier-bearing cell.
///
/// Integers and integral floats (as numbers or numeric strings) render without a
/// fractional part; other strings are trimmed. Null, blank and `NaN` mean absent.
/// Integer strings are read exactly, so ids past 2^53 match their JSON number form.
pub fn canonical_id(value: &Value) -> Result<Option<EmployeeId>, String> {
  match value {
    Value::Null => Ok(None),
    Value::Number(n) => {
      if let Some(i) = n.as_i64() {
        Ok(Some(EmployeeId::new(i.to_string())))
      } else if let Some(u) = n.as_u64() {
        Ok(Some(EmployeeId::new(u.to_string())))
      } else {
        let f = n.as_f64().ok_or_else(|| "unrepresentable number".to_string())?;
        Ok(Some(EmployeeId::new(canonical_float(f))))
      }
    }
    Value::String(s) => {
      let trimmed = s.trim();
      if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
      }
      if let Some(exact) = exact_integer(trimmed) {
        return Ok(Some(EmployeeId::new(exact)));
      }
      match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() >= MAX_EXACT_FLOAT => {
          Ok(Some(EmployeeId::new(trimmed)))
        }
        Ok(f) if f.is_finite() => Ok(Some(EmployeeId::new(canonical_float(f)))),
        _ => Ok(Some(EmployeeId::new(trimmed))),
      }
    }
    other => Err(format!("expected an identifier, found {}", type_name(other))),
  }
}

const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// `"42"`, `"007"` and `"42.000"` as an exact integer string.
fn exact_integer(s: &str) -> Option<String> {
  let digits = match s.split_once('.') {
    Some((whole, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => whole,
    Some(_) => return None,
    None => s,
  };
  if let Ok(i) = digits.parse::<i64>() {
    Some(i.to_string())
  } else {
    digits.parse::<u64>().ok().map(|u| u.to_string())
  }
}

fn canonical_float(f: f64) -> String {
  if f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT {
    format!("{}", f as i64)
  } else {
    f.to_string()
  }
}

fn text_cell(value: &Value) -> Result<String, String> {
  let s = match value {
    Value::String(s) => s.trim().to_string(),
    Value::Number(n) => n.to_string(),
    Value::Null => return Err("must not be empty".into()),
    other => return Err(format!("expected text, found {}", type_name(other))),
  };
  if s.is_empty() {
    Err("must not be empty".into())
  } else {
    Ok(s)
  }
}

fn level_cell(value: &Value) -> Result<u32, String> {
  let f = numeric(value)?;
  if f < 0.0 {
    return Err("must be >= 0".into());
  }
  if f.fract() != 0.0 {
    return Err(format!("expected an integer, found {}", f));
  }
  if f > u32::MAX as f64 {
    return Err("out of range".into());
  }
  Ok(f as u32)
}

fn cost_cell(value: &Value) -> Result<f64, String> {
  let f = match value {
    Value::String(s) => {
      let cleaned: String = s.trim().trim_start_matches('$').chars().filter(|c| *c != ',').collect();
      cleaned
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("expected a number, found {:?}", s))?
    }
    other => numeric(other)?,
  };
  if !f.is_finite() {
    return Err("must be finite".into());
  }
  if f < 0.0 {
    return Err("must be >= 0".into());
  }
  Ok(f)
}

fn numeric(value: &Value) -> Result<f64, String> {
  match value {
    Value::Number(n) => n.as_f64().ok_or_else(|| "unrepresentable number".to_string()),
    Value::String(s) => s
      .trim()
      .parse::<f64>()
      .ok()
      .filter(|f| f.is_finite())
      .ok_or_else(|| format!("expected a number, found {:?}", s)),
    Value::Null => Err("must not be empty".into()),
    other => Err(format!("expected a number, found {}", type_name(other))),
  }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

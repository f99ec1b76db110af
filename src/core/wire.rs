//! Lenient accessors over loosely-typed backend records.
//!
//! Provider records disagree on key names and on whether numbers arrive quoted, so lookups take
//! a list of candidate keys and return the first usable value.

use serde_json::{Map, Value};

pub(crate) type Record = Map<String, Value>;

/// First non-null value among `keys`.
pub(crate) fn first_value<'a>(rec: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| rec.get(*k))
        .find(|v| !v.is_null())
}

/// First non-blank string among `keys`; numbers are rendered (`500325` -> `"500325"`).
pub(crate) fn first_str(rec: &Record, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| rec.get(*k)).find_map(as_text)
}

pub(crate) fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First numeric value among `keys`; quoted numbers and a trailing `%` are accepted.
pub(crate) fn first_f64(rec: &Record, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|k| rec.get(*k)).find_map(as_f64)
}

pub(crate) fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

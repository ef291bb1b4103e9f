//! Lenient coercion of JSON option/input values.
//!
//! `configure` and `process` never fail on malformed values; these helpers
//! turn a `serde_json::Value` into the wanted primitive when it plausibly is
//! one and return `None` otherwise, letting the caller keep its prior or
//! default value.

use serde_json::{Map, Value};

/// Coerces a JSON number to `usize`. Negative and non-numeric values are `None`.
pub(crate) fn as_usize(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|v| v as usize)
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as usize)),
        _ => None,
    }
}

/// Coerces a JSON number to a finite `f64`.
pub(crate) fn as_finite_f64(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite())
}

/// Coerces a JSON number to `i64`, accepting floats by truncation.
pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
}

/// Returns the value as an object map, or an empty map for anything else.
pub(crate) fn as_map_or_empty(value: Option<&Value>) -> Map<String, Value> {
    value
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

//! Form encoding for POST payloads
//!
//! The API takes `application/x-www-form-urlencoded` bodies. Payloads are
//! JSON objects, so nested values are flattened with bracket notation the way
//! the service's own web clients send them: `a[b]=1` for objects and
//! `a[0]=x` for arrays. Empty arrays and objects contribute no pairs.

use serde_json::{Map, Value};

/// Flatten a JSON object into ordered `(key, value)` form pairs.
pub fn encode(payload: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(payload.len());
    for (key, value) in payload {
        flatten(key.clone(), value, &mut pairs);
    }
    pairs
}

fn flatten(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => pairs.push((key, String::new())),
        Value::Bool(b) => pairs.push((key, b.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(format!("{key}[{index}]"), item, pairs);
            }
        }
        Value::Object(fields) => {
            for (name, field) in fields {
                flatten(format!("{key}[{name}]"), field, pairs);
            }
        }
    }
}

//! Building values from `serde_json` documents.

use indexmap::IndexMap;
use serde_json::Number;

use crate::array::Array;
use crate::map::Map;
use crate::value::Value;

/// Converts a JSON document into a deeply frozen value.
pub fn from_json(json: &serde_json::Value) -> Value {
    convert(json, true)
}

/// Converts a JSON document into a value whose arrays and objects are all
/// mutable and unconstrained.
pub fn from_json_mutable(json: &serde_json::Value) -> Value {
    convert(json, false)
}

fn convert(json: &serde_json::Value, frozen: bool) -> Value {
    match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => number(n),
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(xs) => {
            let items: Vec<Value> = xs.iter().map(|x| convert(x, frozen)).collect();
            match frozen {
                true => Value::Array(Array::new(items)),
                false => Value::Array(Array::untyped(items)),
            }
        }
        serde_json::Value::Object(object) => {
            let entries: IndexMap<Value, Value> = object
                .iter()
                .map(|(k, v)| (Value::from(k.as_str()), convert(v, frozen)))
                .collect();
            match frozen {
                true => Value::Map(Map::new(entries)),
                false => Value::Map(Map::untyped(entries)),
            }
        }
    }
}

/// Integers that fit in `i64` stay integral, everything else is a float.
fn number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::Integer(i);
    }
    match n.as_u64() {
        Some(u) => Value::from(u as f64),
        None => Value::from(n.as_f64().unwrap_or(f64::NAN)),
    }
}

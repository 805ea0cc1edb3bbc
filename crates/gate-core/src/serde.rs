use std::collections::BTreeMap;
use std::iter::FromIterator;

use ::serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{serde_error, GateError};

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut ordered = BTreeMap::new();
            for (key, val) in map {
                ordered.insert(key, sort_keys(val));
            }
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Compact JSON with object keys sorted at every depth.
///
/// Two certificates built from the same input compare byte-for-byte.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, GateError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    let canonical = sort_keys(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical).map_err(|err| serde_error("json-write", err))?;
    Ok(bytes)
}

/// Indented variant of [`to_canonical_json_bytes`] for `--pretty` output.
pub fn to_canonical_json_pretty<T: Serialize>(value: &T) -> Result<String, GateError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    serde_json::to_string_pretty(&sort_keys(value)).map_err(|err| serde_error("json-write", err))
}

/// Reads a certificate or report back, mapping failures to `json-read`.
pub fn from_json_slice<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, GateError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-read", err))
}

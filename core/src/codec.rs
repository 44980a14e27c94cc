//! Conversion between typed entities and JSON envelopes.
//!
//! The backend wraps every entity in `{"data": ...}`. The decoders here check
//! the envelope shape first (object for a single entity, array for a
//! collection) and then hand the inner value to serde, reporting both kinds
//! of failure as `SchemaMismatch`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Encode a payload using its serde field map.
pub fn encode<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Decode the single entity under `data`.
pub fn decode_data<T: DeserializeOwned>(envelope: Value) -> Result<T> {
    match take_data(envelope) {
        Some(data @ Value::Object(_)) => decode_entity(data),
        Some(other) => Err(shape_error("object", &other)),
        None => Err(ApiError::SchemaMismatch(
            "expected 'data' object in response".to_string(),
        )),
    }
}

/// Decode the collection under `data`.
pub fn decode_data_list<T: DeserializeOwned>(envelope: Value) -> Result<Vec<T>> {
    match take_data(envelope) {
        Some(Value::Array(items)) => items.into_iter().map(decode_entity).collect(),
        Some(other) => Err(shape_error("array", &other)),
        None => Err(ApiError::SchemaMismatch(
            "expected 'data' array in response".to_string(),
        )),
    }
}

/// Decode `data` if the envelope carries one. Responses to updates may omit
/// it; when present it is decoded as strictly as [`decode_data`].
pub fn decode_optional_data<T: DeserializeOwned>(envelope: Value) -> Result<Option<T>> {
    match take_data(envelope) {
        None | Some(Value::Null) => Ok(None),
        Some(data @ Value::Object(_)) => decode_entity(data).map(Some),
        Some(other) => Err(shape_error("object", &other)),
    }
}

fn take_data(envelope: Value) -> Option<Value> {
    match envelope {
        Value::Object(mut map) => map.remove("data"),
        _ => None,
    }
}

fn decode_entity<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ApiError::SchemaMismatch(e.to_string()))
}

fn shape_error(expected: &str, found: &Value) -> ApiError {
    let kind = match found {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ApiError::SchemaMismatch(format!("expected 'data' {expected} in response, found {kind}"))
}

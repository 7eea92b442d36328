//! Argument sources and their merge.
//!
//! Sources are layered with later ones replacing earlier ones on key
//! collision: path variables, query parameters, form fields, JSON body.
//! Query and form values arrive as lists of strings; the schema decoder
//! collapses single-element lists for scalar fields.

use arsa_core::{Fault, Request};
use arsa_router::Params;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Parses the JSON body, if the request carries one.
///
/// Bodies are skipped when empty or form-encoded. A body over `limit`
/// bytes faults before any parsing. A body that parses to anything other
/// than an object is malformed.
pub(crate) fn parse_body(request: &Request, limit: usize) -> Result<Option<Map<String, Value>>, Fault> {
    let Some(body) = request.body().filter(|b| !b.is_empty()) else {
        return Ok(None);
    };

    if body.len() > limit {
        return Err(Fault::PayloadTooLarge { limit });
    }

    if request.is_form() {
        return Ok(None);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(other) => Err(Fault::malformed_body(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(Fault::malformed_body(e)),
    }
}

/// Merges every argument source into one mapping.
///
/// With `protect_path_variables`, keys that name a path variable are never
/// replaced by a later source.
pub(crate) fn merge_sources(
    params: &Params,
    request: &Request,
    body: Option<Map<String, Value>>,
    protect_path_variables: bool,
) -> Map<String, Value> {
    let mut merged: Map<String, Value> = params
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_json()))
        .collect();

    let layers = [
        ("query", request.query().to_arguments()),
        ("form", request.form().to_arguments()),
        ("body", body.unwrap_or_default()),
    ];

    for (source, layer) in layers {
        for (key, value) in layer {
            if params.get(&key).is_some() {
                if protect_path_variables {
                    debug!(argument = %key, source, "path variable kept");
                    continue;
                }
                warn!(argument = %key, source, "path variable overridden");
            }
            merged.insert(key, value);
        }
    }

    merged
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

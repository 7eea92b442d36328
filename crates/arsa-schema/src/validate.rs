//! Recursive, fail-fast validation of raw arguments.

use serde_json::{Map, Value};
use tracing::trace;

use crate::descriptor::{json_type, Descriptor};
use crate::error::{SchemaError, SchemaResult};
use crate::model::Schema;

/// Validates `raw` against `schema`, stopping at the first violation.
///
/// Fields are visited in declaration order. Paths are reported relative to
/// `qualified`, so a nested failure reads like `create_account.owner.name`
/// and a list element like `create_account.foos.0.name`. A `null` value
/// counts as absent.
///
/// A single-element list arriving for a non-list field is checked as its
/// only element, matching what [`crate::decode`] will produce.
///
/// # Example
///
/// ```rust
/// use arsa_schema::{validate, Attribute, Schema, SchemaError};
/// use serde_json::json;
///
/// let mut schema = Schema::new();
/// schema.require("name", Attribute::string());
///
/// let raw = json!({}).as_object().cloned().unwrap();
/// let err = validate("create_user", &raw, &schema).unwrap_err();
/// assert_eq!(err, SchemaError::MissingArgument { path: "create_user.name".into() });
/// ```
pub fn validate(qualified: &str, raw: &Map<String, Value>, schema: &Schema) -> SchemaResult<()> {
    for (name, attribute) in schema.iter() {
        let path = join(qualified, name);
        match present(raw.get(name)) {
            None if attribute.is_optional() => {}
            None => {
                trace!(path = %path, "required argument missing");
                return Err(SchemaError::MissingArgument { path });
            }
            Some(value) => check_field(&path, value, attribute.descriptor())?,
        }
    }
    Ok(())
}

pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

pub(crate) fn collapse(value: &Value) -> &Value {
    match value {
        Value::Array(items) => match items.as_slice() {
            [only] => only,
            _ => value,
        },
        _ => value,
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_field(path: &str, value: &Value, descriptor: &Descriptor) -> SchemaResult<()> {
    if descriptor.is_list() {
        check_element(path, value, descriptor)
    } else {
        check_element(path, collapse(value), descriptor)
    }
}

fn check_element(path: &str, value: &Value, descriptor: &Descriptor) -> SchemaResult<()> {
    match (descriptor, value) {
        (Descriptor::Primitive(kind), _) if kind.accepts(value) => Ok(()),
        (Descriptor::Nested(model), Value::Object(fields)) => {
            validate(path, fields, model.schema())
        }
        (Descriptor::ListOf(element), Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                check_element(&join(path, &index.to_string()), item, element)?;
            }
            Ok(())
        }
        _ => {
            trace!(path = %path, expected = %descriptor.type_name(), "argument type mismatch");
            Err(SchemaError::TypeMismatch {
                path: path.to_string(),
                expected: descriptor.type_name(),
                found: json_type(value),
            })
        }
    }
}

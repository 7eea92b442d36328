//! Handler return values.

use std::fmt::Display;

use arsa_schema::Instance;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::fault::Fault;

/// What a handler returns on success.
///
/// The dispatcher serializes it according to the route's content type.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A JSON value.
    Json(Value),
    /// A model instance, rendered as its attribute mapping.
    Model(Instance),
    /// Text.
    Text(String),
    /// Raw bytes.
    Bytes(Bytes),
    /// Nothing.
    Empty,
}

impl Output {
    /// Serializes any value into [`Output::Json`].
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Fault> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(Fault::unhandled)
    }

    /// Uses the value's string form.
    pub fn display<T: Display + ?Sized>(value: &T) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Instance> for Output {
    fn from(instance: Instance) -> Self {
        Self::Model(instance)
    }
}

impl From<String> for Output {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Output {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Bytes> for Output {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Output {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<()> for Output {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct User {
        name: &'static str,
    }

    #[test]
    fn test_json_from_serialize() {
        let output = Output::json(&User { name: "ann" }).unwrap();
        assert_eq!(output, Output::Json(json!({"name": "ann"})));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Output::from("hi"), Output::Text("hi".into()));
        assert_eq!(Output::from(()), Output::Empty);
        assert_eq!(Output::display(&42), Output::Text("42".into()));
    }
}

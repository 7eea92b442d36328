//! Path variable extraction and storage.
//!
//! Variables are stored as (name, value) pairs using a small-vector
//! optimization, since most patterns declare between one and four variables.
//! Values keep the type produced by their converter so that an `int`
//! variable reaches the schema engine as a number, not a string.

use std::fmt;

use serde_json::Value;
use smallvec::SmallVec;
use uuid::Uuid;

/// Maximum number of variables stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// A converted path variable value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Produced by the `string` and `path` converters.
    Str(String),
    /// Produced by the `int` converter.
    Int(i64),
    /// Produced by the `float` converter.
    Float(f64),
    /// Produced by the `uuid` converter.
    Uuid(Uuid),
}

impl ParamValue {
    /// Returns the value as a string slice when it came from a textual converter.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer when it came from the `int` converter.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Converts the value to its JSON representation.
    ///
    /// Non-finite floats cannot occur here because the `float` converter
    /// only accepts `digits.digits`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Int(n) => Value::from(*n),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Uuid(u) => Value::String(u.to_string()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Uuid(u) => write!(f, "{u}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Extracted path variables from a route match.
///
/// # Example
///
/// ```rust
/// use arsa_router::{Params, ParamValue};
///
/// let mut params = Params::new();
/// params.push("slug", "bar");
/// params.push("id", 42_i64);
///
/// assert_eq!(params.get("slug").and_then(ParamValue::as_str), Some("bar"));
/// assert_eq!(params.get("id").and_then(ParamValue::as_i64), Some(42));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    inner: SmallVec<[(String, ParamValue); INLINE_PARAMS]>,
}

impl Params {
    /// Creates a new empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a params set with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Adds a variable to the set.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value for a variable by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns true if there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the variables in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl FromIterator<(String, ParamValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_new() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn test_params_push_and_get() {
        let mut params = Params::new();
        params.push("id", 123_i64);
        params.push("name", "alice");

        assert_eq!(params.get("id"), Some(&ParamValue::Int(123)));
        assert_eq!(params.get("name"), Some(&ParamValue::Str("alice".into())));
        assert_eq!(params.get("unknown"), None);
    }

    #[test]
    fn test_params_iter_keeps_order() {
        let mut params = Params::new();
        params.push("a", "1");
        params.push("b", "2");

        let names: Vec<_> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_params_many_params() {
        let mut params = Params::new();
        for i in 0..10 {
            params.push(format!("key{i}"), format!("value{i}"));
        }

        assert_eq!(params.len(), 10);
        assert_eq!(
            params.get("key5").and_then(ParamValue::as_str),
            Some("value5")
        );
    }

    #[test]
    fn test_param_value_to_json() {
        assert_eq!(ParamValue::Int(7).to_json(), serde_json::json!(7));
        assert_eq!(ParamValue::Float(1.5).to_json(), serde_json::json!(1.5));
        assert_eq!(ParamValue::from("x").to_json(), serde_json::json!("x"));

        let id = Uuid::nil();
        assert_eq!(
            ParamValue::Uuid(id).to_json(),
            serde_json::json!("00000000-0000-0000-0000-000000000000")
        );
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::Int(-3).to_string(), "-3");
        assert_eq!(ParamValue::from("bar").to_string(), "bar");
    }
}

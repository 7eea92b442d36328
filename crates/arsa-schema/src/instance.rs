//! Decoded values and model instances.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::model::ModelRef;

/// A decoded argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A primitive or undeclared value, as received.
    Value(Value),
    /// A nested model instance.
    Model(Instance),
    /// A decoded list.
    List(Vec<Decoded>),
}

impl Decoded {
    /// Returns the raw JSON value for primitive values.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string for string values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Returns the integer for integral values.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    /// Returns the number for numeric values.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_f64)
    }

    /// Returns the boolean for boolean values.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    /// Returns the model instance for nested values.
    #[must_use]
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Model(instance) => Some(instance),
            _ => None,
        }
    }

    /// Returns the elements for list values.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Decoded]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Renders the value back to JSON. Instances become their attribute mapping.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Model(instance) => instance.to_value(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_value).collect()),
        }
    }
}

impl Serialize for Decoded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::Model(instance) => instance.serialize(serializer),
            Self::List(items) => serializer.collect_seq(items),
        }
    }
}

/// An instance of a declared model: a mapping from field name to value.
///
/// # Example
///
/// ```rust
/// use arsa_schema::{decode_model, Attribute, ModelSchema};
/// use serde_json::json;
///
/// let owner = ModelSchema::builder("Owner")
///     .required("name", Attribute::string())
///     .build();
///
/// let raw = json!({"name": "ann"});
/// let instance = decode_model(&owner, raw.as_object().unwrap());
/// assert_eq!(instance.to_value(), raw);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    model: ModelRef,
    values: IndexMap<String, Decoded>,
}

impl Instance {
    /// Creates an instance from already decoded values.
    #[must_use]
    pub fn new(model: ModelRef, values: IndexMap<String, Decoded>) -> Self {
        Self { model, values }
    }

    /// The model this instance belongs to.
    #[must_use]
    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    /// The model name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.model.name()
    }

    /// Returns a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Decoded> {
        self.values.get(field)
    }

    /// Iterates present fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Decoded)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Renders the attribute mapping as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect();
        Value::Object(map)
    }

    /// Deserializes the attribute mapping into a typed struct.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.to_value())
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_model, Attribute, ModelSchema};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Owner {
        name: String,
        age: Option<i64>,
    }

    fn owner_model() -> ModelRef {
        ModelSchema::builder("Owner")
            .required("name", Attribute::string())
            .optional("age", Attribute::integer())
            .build()
    }

    #[test]
    fn test_serialize_as_attribute_mapping() {
        let instance = decode_model(&owner_model(), json!({"name": "ann", "age": 4}).as_object().unwrap());
        assert_eq!(
            serde_json::to_string(&instance).unwrap(),
            r#"{"name":"ann","age":4}"#
        );
    }

    #[test]
    fn test_deserialize_into_struct() {
        let instance = decode_model(&owner_model(), json!({"name": "ann"}).as_object().unwrap());
        let owner: Owner = instance.deserialize_into().unwrap();
        assert_eq!(
            owner,
            Owner {
                name: "ann".into(),
                age: None
            }
        );
    }

    #[test]
    fn test_decoded_accessors() {
        assert_eq!(Decoded::Value(json!(3)).as_i64(), Some(3));
        assert_eq!(Decoded::Value(json!(true)).as_bool(), Some(true));
        assert_eq!(Decoded::Value(json!(1.5)).as_f64(), Some(1.5));
        assert!(Decoded::List(vec![]).as_value().is_none());
        assert_eq!(
            Decoded::List(vec![Decoded::Value(json!("a"))]).to_value(),
            json!(["a"])
        );
    }
}

//! Decoding of validated arguments into model instances.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::descriptor::Descriptor;
use crate::instance::{Decoded, Instance};
use crate::model::{ModelRef, Schema};
use crate::validate::{collapse, present};

/// Decodes validated arguments.
///
/// Declared fields come first in declaration order: nested models become
/// [`Instance`]s, lists are decoded element-wise, and a single-element list
/// for a non-list field collapses to its element. Undeclared arguments
/// follow unchanged. Absent and `null` fields are omitted.
///
/// Input that has not passed [`crate::validate`] is decoded on a best-effort
/// basis: values that do not fit their descriptor are kept as raw JSON.
pub fn decode(raw: &Map<String, Value>, schema: &Schema) -> IndexMap<String, Decoded> {
    let mut decoded = decode_fields(raw, schema);
    for (name, value) in raw {
        if !schema.contains(name) {
            decoded.insert(name.clone(), Decoded::Value(value.clone()));
        }
    }
    decoded
}

/// Builds an instance of `model` from its attribute mapping.
///
/// Only declared fields are kept.
#[must_use]
pub fn decode_model(model: &ModelRef, raw: &Map<String, Value>) -> Instance {
    Instance::new(model.clone(), decode_fields(raw, model.schema()))
}

fn decode_fields(raw: &Map<String, Value>, schema: &Schema) -> IndexMap<String, Decoded> {
    let mut decoded = IndexMap::with_capacity(schema.len());
    for (name, attribute) in schema.iter() {
        let Some(value) = present(raw.get(name)) else {
            continue;
        };
        let descriptor = attribute.descriptor();
        let value = if descriptor.is_list() {
            value
        } else {
            collapse(value)
        };
        decoded.insert(name.to_string(), decode_element(value, descriptor));
    }
    decoded
}

fn decode_element(value: &Value, descriptor: &Descriptor) -> Decoded {
    match (descriptor, value) {
        (Descriptor::Nested(model), Value::Object(fields)) => {
            Decoded::Model(decode_model(model, fields))
        }
        (Descriptor::ListOf(element), Value::Array(items)) => Decoded::List(
            items
                .iter()
                .map(|item| decode_element(item, element))
                .collect(),
        ),
        _ => Decoded::Value(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, ModelSchema};
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_nested_model_becomes_instance() {
        let owner = ModelSchema::builder("Owner")
            .required("name", Attribute::string())
            .build();
        let mut schema = Schema::new();
        schema.require("owner", Attribute::nested(owner));

        let decoded = decode(&args(json!({"owner": {"name": "ann", "extra": 1}})), &schema);
        let instance = decoded["owner"].as_instance().unwrap();
        assert_eq!(instance.name(), "Owner");
        assert_eq!(instance.get("name").and_then(Decoded::as_str), Some("ann"));
        assert!(instance.get("extra").is_none());
    }

    #[test]
    fn test_scalar_collapses_but_list_does_not() {
        let mut schema = Schema::new();
        schema.require("name", Attribute::string());
        schema.require("tags", Attribute::list_of(Attribute::string()));

        let decoded = decode(&args(json!({"name": ["bob"], "tags": ["a"]})), &schema);
        assert_eq!(decoded["name"], Decoded::Value(json!("bob")));
        assert_eq!(
            decoded["tags"],
            Decoded::List(vec![Decoded::Value(json!("a"))])
        );
    }

    #[test]
    fn test_optional_absent_is_omitted() {
        let mut schema = Schema::new();
        schema.allow("nick", Attribute::string());
        let decoded = decode(&Map::new(), &schema);
        assert!(!decoded.contains_key("nick"));
    }

    #[test]
    fn test_undeclared_arguments_pass_through() {
        let mut schema = Schema::new();
        schema.require("b", Attribute::integer());

        let decoded = decode(&args(json!({"a": ["x"], "b": 2})), &schema);
        let keys: Vec<_> = decoded.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(decoded["a"], Decoded::Value(json!(["x"])));
    }

    #[test]
    fn test_list_of_models() {
        let foo = ModelSchema::builder("Foo")
            .required("name", Attribute::string())
            .build();
        let mut schema = Schema::new();
        schema.require("foos", Attribute::list_of(Attribute::nested(foo)));

        let decoded = decode(&args(json!({"foos": [{"name": "a"}, {"name": "b"}]})), &schema);
        let list = decoded["foos"].as_list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list[1].as_instance().and_then(|i| i.get("name")).and_then(Decoded::as_str),
            Some("b")
        );
    }
}

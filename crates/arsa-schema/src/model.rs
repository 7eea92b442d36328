//! Ordered field schemas and model declarations.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptor::Attribute;

/// Shared handle to a declared model.
pub type ModelRef = Arc<ModelSchema>;

/// Ordered mapping from field name to [`Attribute`].
///
/// Fields keep their declaration order. Re-declaring a field replaces its
/// attribute in place, so its position does not change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: IndexMap<String, Attribute>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares or amends a field.
    pub fn insert(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.fields.insert(name.into(), attribute);
    }

    /// Declares a required field.
    pub fn require(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.insert(name, attribute.with_optional(false));
    }

    /// Declares an optional field.
    pub fn allow(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.insert(name, attribute.with_optional(true));
    }

    /// Returns a field's attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.fields.get(name)
    }

    /// Returns true if the field is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A named model: its fields and their attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    name: String,
    schema: Schema,
}

impl ModelSchema {
    /// Starts declaring a model.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ModelSchemaBuilder {
        ModelSchemaBuilder {
            name: name.into(),
            schema: Schema::new(),
        }
    }

    /// Model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Builder for [`ModelSchema`].
///
/// # Example
///
/// ```rust
/// use arsa_schema::{Attribute, ModelSchema};
///
/// let owner = ModelSchema::builder("Owner")
///     .required("name", Attribute::string())
///     .optional("email", Attribute::string())
///     .build();
///
/// assert_eq!(owner.name(), "Owner");
/// assert_eq!(owner.schema().len(), 2);
/// ```
#[derive(Debug)]
#[must_use]
pub struct ModelSchemaBuilder {
    name: String,
    schema: Schema,
}

impl ModelSchemaBuilder {
    /// Adds a required field.
    pub fn required(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.schema.require(name, attribute);
        self
    }

    /// Adds an optional field.
    pub fn optional(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.schema.allow(name, attribute);
        self
    }

    /// Finishes the declaration.
    pub fn build(self) -> ModelRef {
        Arc::new(ModelSchema {
            name: self.name,
            schema: self.schema,
        })
    }
}

/// A Rust type with a declared model schema.
///
/// Implementations compute the schema once and hand out clones of the
/// cached handle:
///
/// ```rust
/// use std::sync::OnceLock;
/// use arsa_schema::{Attribute, Model, ModelRef, ModelSchema};
///
/// struct Owner;
///
/// impl Model for Owner {
///     fn schema() -> ModelRef {
///         static SCHEMA: OnceLock<ModelRef> = OnceLock::new();
///         SCHEMA
///             .get_or_init(|| {
///                 ModelSchema::builder("Owner")
///                     .required("name", Attribute::string())
///                     .build()
///             })
///             .clone()
///     }
/// }
///
/// assert!(std::sync::Arc::ptr_eq(&Owner::schema(), &Owner::schema()));
/// ```
pub trait Model {
    /// Returns the cached schema for this type.
    fn schema() -> ModelRef;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_keeps_declaration_order() {
        let mut schema = Schema::new();
        schema.require("zeta", Attribute::string());
        schema.require("alpha", Attribute::string());
        schema.allow("mid", Attribute::integer());

        let names: Vec<_> = schema.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_amending_keeps_position() {
        let mut schema = Schema::new();
        schema.require("a", Attribute::string());
        schema.require("b", Attribute::string());
        schema.allow("a", Attribute::integer());

        let (first, attr) = schema.iter().next().unwrap();
        assert_eq!(first, "a");
        assert!(attr.is_optional());
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_required_overrides_optional_flag() {
        let model = ModelSchema::builder("M")
            .required("x", Attribute::string().optional())
            .build();
        assert!(!model.schema().get("x").unwrap().is_optional());
    }
}

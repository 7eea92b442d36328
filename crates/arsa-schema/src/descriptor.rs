//! Type descriptors for declared attributes.

use std::fmt;

use serde_json::Value;

use crate::model::ModelRef;

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// JSON string.
    String,
    /// JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Float,
    /// JSON boolean.
    Boolean,
    /// JSON object with arbitrary content.
    Mapping,
}

impl Kind {
    /// Name used in type mismatch messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Mapping => "mapping",
        }
    }

    /// Returns true if `value` is of this kind.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Mapping => value.is_object(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of shapes an attribute can declare.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// A primitive value.
    Primitive(Kind),
    /// A nested model instance.
    Nested(ModelRef),
    /// A list whose elements all share one descriptor.
    ListOf(Box<Descriptor>),
}

impl Descriptor {
    /// Name used in type mismatch messages.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.name().to_string(),
            Self::Nested(model) => model.name().to_string(),
            Self::ListOf(element) => format!("list of {}", element.type_name()),
        }
    }

    /// Returns true for list descriptors.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::ListOf(_))
    }
}

/// A typed field declaration.
///
/// # Example
///
/// ```rust
/// use arsa_schema::{Attribute, Descriptor, Kind};
///
/// let tags = Attribute::list_of(Attribute::string()).optional();
/// assert!(tags.is_optional());
/// assert_eq!(tags.descriptor().type_name(), "list of string");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    descriptor: Descriptor,
    optional: bool,
}

impl Attribute {
    /// Creates a required attribute with the given descriptor.
    #[must_use]
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            optional: false,
        }
    }

    /// A string attribute.
    #[must_use]
    pub fn string() -> Self {
        Self::new(Descriptor::Primitive(Kind::String))
    }

    /// An integer attribute.
    #[must_use]
    pub fn integer() -> Self {
        Self::new(Descriptor::Primitive(Kind::Integer))
    }

    /// A float attribute. Integral numbers are accepted.
    #[must_use]
    pub fn float() -> Self {
        Self::new(Descriptor::Primitive(Kind::Float))
    }

    /// A boolean attribute.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(Descriptor::Primitive(Kind::Boolean))
    }

    /// A free-form mapping attribute.
    #[must_use]
    pub fn mapping() -> Self {
        Self::new(Descriptor::Primitive(Kind::Mapping))
    }

    /// A nested model attribute for a [`crate::Model`] type.
    #[must_use]
    pub fn model<M: crate::Model>() -> Self {
        Self::nested(M::schema())
    }

    /// A nested model attribute from an explicit schema.
    #[must_use]
    pub fn nested(model: ModelRef) -> Self {
        Self::new(Descriptor::Nested(model))
    }

    /// A list attribute whose elements follow `element`.
    ///
    /// The element's own optionality is ignored.
    #[must_use]
    pub fn list_of(element: Self) -> Self {
        Self::new(Descriptor::ListOf(Box::new(element.descriptor)))
    }

    /// Marks the attribute optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub(crate) fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Returns the declared descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Returns true if the attribute may be omitted.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// JSON type name of a value, for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_accepts() {
        assert!(Kind::String.accepts(&json!("x")));
        assert!(!Kind::String.accepts(&json!(1)));
        assert!(Kind::Integer.accepts(&json!(3)));
        assert!(!Kind::Integer.accepts(&json!(3.5)));
        assert!(Kind::Float.accepts(&json!(3)));
        assert!(Kind::Float.accepts(&json!(3.5)));
        assert!(Kind::Boolean.accepts(&json!(false)));
        assert!(Kind::Mapping.accepts(&json!({"a": 1})));
        assert!(!Kind::Mapping.accepts(&json!([1])));
    }

    #[test]
    fn test_attribute_defaults_to_required() {
        let attr = Attribute::integer();
        assert!(!attr.is_optional());
        assert_eq!(attr.descriptor(), &Descriptor::Primitive(Kind::Integer));
    }

    #[test]
    fn test_list_of_list() {
        let attr = Attribute::list_of(Attribute::list_of(Attribute::boolean()));
        assert!(attr.descriptor().is_list());
        assert_eq!(attr.descriptor().type_name(), "list of list of boolean");
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type(&json!(null)), "null");
        assert_eq!(json_type(&json!(1.5)), "float");
        assert_eq!(json_type(&json!(1)), "integer");
        assert_eq!(json_type(&json!([])), "list");
    }
}

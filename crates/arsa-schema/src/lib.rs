//! Declarative argument schemas for Arsa.
//!
//! A schema is an ordered mapping from field name to [`Attribute`]. Each
//! attribute carries a [`Descriptor`] from a closed set (a primitive
//! [`Kind`], a nested [`ModelSchema`], or a list of either) and an
//! optional flag.
//!
//! [`validate`] walks raw JSON arguments against a schema and reports the
//! first violation with its qualified dotted path. [`decode`] then turns
//! nested mappings into [`Instance`]s and collapses single-element lists
//! that arrived from multi-valued sources for scalar fields.
//!
//! Both functions are pure and synchronous.
//!
//! # Example
//!
//! ```rust
//! use arsa_schema::{decode, validate, Attribute, ModelSchema, Schema};
//! use serde_json::json;
//!
//! let owner = ModelSchema::builder("Owner")
//!     .required("name", Attribute::string())
//!     .build();
//!
//! let mut schema = Schema::new();
//! schema.require("owner", Attribute::nested(owner));
//! schema.allow("tags", Attribute::list_of(Attribute::string()));
//!
//! let raw = json!({"owner": {"name": "ann"}});
//! let raw = raw.as_object().unwrap();
//!
//! validate("create_account", raw, &schema).unwrap();
//! let args = decode(raw, &schema);
//! assert_eq!(args["owner"].as_instance().unwrap().name(), "Owner");
//! assert!(!args.contains_key("tags"));
//! ```

mod decode;
mod descriptor;
mod error;
mod instance;
mod model;
mod validate;

pub use decode::{decode, decode_model};
pub use descriptor::{Attribute, Descriptor, Kind};
pub use error::{SchemaError, SchemaResult};
pub use instance::{Decoded, Instance};
pub use model::{Model, ModelRef, ModelSchema, ModelSchemaBuilder, Schema};
pub use validate::validate;

//! # Arsa
//!
//! **Declarative request dispatch for serverless HTTP handlers**
//!
//! Applications declare routes, per-route argument schemas and an optional
//! custom authorizer. Arsa matches each invocation to a handler, merges
//! and validates its arguments, runs middleware, invokes the handler and
//! maps every failure to a structured response.
//!
//! ## Quick Start
//!
//! ```rust
//! use arsa::prelude::*;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let mut app = App::new();
//! app.route("create_user", "/users", |args: Arguments| async move {
//!     let name = args.get_str("name").unwrap_or_default().to_string();
//!     Ok::<_, Fault>(json!({ "name": name }))
//! })
//! .methods(["POST"])
//! .required("name", Attribute::string());
//!
//! let dispatcher = app.build().unwrap();
//!
//! let request = Request::builder()
//!     .method(http::Method::POST)
//!     .path("/users")
//!     .header("content-type", "application/json")
//!     .body(r#"{"name": "ann"}"#)
//!     .build();
//!
//! let response = dispatcher.dispatch(request).await.unwrap();
//! assert_eq!(response.status(), 200);
//! assert_eq!(response.body_text(), r#"{"name":"ann"}"#);
//! # });
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Request → Middleware → Match → Merge → Validate → Decode → Handler
//!                                                               ↓
//! Response ←─────────────── Fault mapping ←──── Serialize ←─────┘
//! ```

#![doc(html_root_url = "https://docs.rs/arsa/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod dispatcher;
mod error;
pub mod lambda;
mod merge;
mod registry;
mod serialize;

pub use app::App;
pub use dispatcher::Dispatcher;
pub use error::{BuildError, DispatchError, LambdaError};
pub use registry::{Route, RouteRegistry, RESERVED_ARGUMENTS};

pub use arsa_schema::{Attribute, Model, ModelRef, ModelSchema, Schema};

// Re-export component crates
pub use arsa_authz as authz;
pub use arsa_config as config;
pub use arsa_core as core;
pub use arsa_router as router;
pub use arsa_schema as schema;
pub use arsa_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use arsa::prelude::*;
/// ```
pub mod prelude {
    pub use crate::lambda::{ProxyEvent, ProxyResponse};
    pub use crate::{App, BuildError, DispatchError, Dispatcher, LambdaError, Route};

    pub use arsa_authz::{AuthorizerEvent, AuthzError, AuthzResult, Effect, PolicyDocument};
    pub use arsa_config::{ArsaConfig, ConfigLoader};
    pub use arsa_core::{
        middleware_fn, AppFault, Arguments, Fault, HttpFault, Middleware, Output, Redirect,
        Request, RequestContext, Response,
    };
    pub use arsa_schema::{Attribute, Decoded, Instance, Model, ModelRef, ModelSchema};
}

//! Pattern router for Arsa.
//!
//! Routes are declared as patterns made of static segments and typed
//! variables (`/accounts/<int:id>`). Lookups return the most specific
//! matching pattern that allows the request method, the endpoint name bound
//! to it, and the converted path variables.
//!
//! A segment that fails its converter makes the pattern miss entirely, so
//! `/foobar/bar` against `/foobar/<int:slug>` is [`MatchError::NotFound`],
//! never a validation error.
//!
//! # Example
//!
//! ```rust
//! use arsa_router::{MethodSet, ParamValue, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert("/foobar/<slug>", MethodSet::default(), "foobar").unwrap();
//!
//! let m = router.match_route(&Method::GET, "/foobar/bar").unwrap();
//! assert_eq!(m.endpoint, "foobar");
//! assert_eq!(m.params.get("slug").and_then(ParamValue::as_str), Some("bar"));
//! ```

mod error;
mod method_set;
mod params;
mod pattern;
mod router;

pub use error::{MatchError, PatternError};
pub use method_set::MethodSet;
pub use params::{ParamValue, Params};
pub use pattern::{Converter, Pattern, Segment};
pub use router::Router;

/// A matched route with its endpoint name and converted variables.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a> {
    /// The endpoint bound to the winning pattern.
    pub endpoint: &'a str,
    /// The winning pattern.
    pub pattern: &'a Pattern,
    /// Converted path variables.
    pub params: Params,
}

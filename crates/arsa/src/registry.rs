//! Route declarations keyed by handler identity.
//!
//! A [`Route`] is created the first time its handler is mentioned and is
//! amended by every later declaration, so `required` may come before or
//! after `route` for the same handler. [`RouteRegistry::compile`] freezes
//! the declarations into the lookup tables used while serving.

use std::collections::HashMap;

use arsa_config::DispatchConfig;
use arsa_core::{Arguments, ErasedHandler};
use arsa_router::{MethodSet, Router};
use arsa_schema::{Attribute, Schema};
use indexmap::IndexMap;

use crate::error::BuildError;

/// Argument names that cannot appear in a route schema.
pub const RESERVED_ARGUMENTS: [&str; 2] = ["query", Arguments::REQUEST_ARGUMENT];

/// A route declaration.
///
/// # Example
///
/// ```
/// use arsa::{Attribute, RouteRegistry};
///
/// let mut registry = RouteRegistry::new();
/// registry
///     .register("create_user")
///     .set_pattern("/users")
///     .methods(["post"])
///     .required("name", Attribute::string());
///
/// let route = registry.get("create_user").unwrap();
/// assert_eq!(route.pattern(), Some("/users"));
/// assert_eq!(route.method_names(), ["POST"]);
/// ```
#[derive(Clone)]
pub struct Route {
    handler_id: String,
    pattern: Option<String>,
    methods: Vec<String>,
    content_type: Option<String>,
    inject_request: bool,
    schema: Schema,
    handler: Option<ErasedHandler>,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("handler_id", &self.handler_id)
            .field("pattern", &self.pattern)
            .field("methods", &self.methods)
            .field("content_type", &self.content_type)
            .field("inject_request", &self.inject_request)
            .field("fields", &self.schema.len())
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl Route {
    fn new(handler_id: String) -> Self {
        Self {
            handler_id,
            pattern: None,
            methods: vec!["GET".to_string()],
            content_type: None,
            inject_request: false,
            schema: Schema::new(),
            handler: None,
        }
    }

    /// Sets the URL pattern (`/users/<int:id>`).
    pub fn set_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Replaces the allowed methods. Names are upper-cased.
    pub fn methods<I, S>(&mut self, methods: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.methods = methods
            .into_iter()
            .map(|m| m.as_ref().trim().to_ascii_uppercase())
            .collect();
        self
    }

    /// Sets the response content type.
    pub fn content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Passes the canonical request to the handler.
    pub fn inject_request(&mut self) -> &mut Self {
        self.inject_request = true;
        self
    }

    /// Declares a required argument.
    pub fn required(&mut self, name: impl Into<String>, attribute: Attribute) -> &mut Self {
        self.schema.require(name, attribute);
        self
    }

    /// Declares an optional argument.
    pub fn optional(&mut self, name: impl Into<String>, attribute: Attribute) -> &mut Self {
        self.schema.allow(name, attribute);
        self
    }

    /// Sets the handler function.
    pub fn set_handler(&mut self, handler: ErasedHandler) -> &mut Self {
        self.handler = Some(handler);
        self
    }

    /// Handler identity.
    #[must_use]
    pub fn handler_id(&self) -> &str {
        &self.handler_id
    }

    /// The declared pattern, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// The declared method names, upper-cased.
    #[must_use]
    pub fn method_names(&self) -> &[String] {
        &self.methods
    }

    /// The argument schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether the request is injected.
    #[must_use]
    pub fn injects_request(&self) -> bool {
        self.inject_request
    }
}

/// All route declarations, in first-registration order.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: IndexMap<String, Route>,
}

impl RouteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the route for `handler_id`, creating it on first use.
    pub fn register(&mut self, handler_id: impl Into<String>) -> &mut Route {
        let handler_id = handler_id.into();
        self.routes
            .entry(handler_id.clone())
            .or_insert_with(|| Route::new(handler_id))
    }

    /// Looks up a route by handler identity.
    #[must_use]
    pub fn get(&self, handler_id: &str) -> Option<&Route> {
        self.routes.get(handler_id)
    }

    /// Number of declared routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Freezes the declarations into a router and a handler table.
    pub(crate) fn compile(self, config: &DispatchConfig) -> Result<RouteTable, BuildError> {
        let mut router = Router::new();
        let mut routes = HashMap::with_capacity(self.routes.len());

        for (handler_id, route) in self.routes {
            let pattern = route.pattern.ok_or_else(|| BuildError::MissingPattern {
                handler: handler_id.clone(),
            })?;
            let handler = route.handler.ok_or_else(|| BuildError::MissingHandler {
                handler: handler_id.clone(),
            })?;

            if let Some((name, _)) = route
                .schema
                .iter()
                .find(|(name, _)| RESERVED_ARGUMENTS.contains(name))
            {
                return Err(BuildError::ReservedArgument {
                    handler: handler_id,
                    name: name.to_string(),
                });
            }

            let content_type = route
                .content_type
                .unwrap_or_else(|| config.default_content_type.clone());
            if content_type.parse::<mime::Mime>().is_err() {
                return Err(BuildError::InvalidContentType {
                    handler: handler_id,
                    content_type,
                });
            }

            let methods = MethodSet::parse(&route.methods).and_then(|methods| {
                router.insert(&pattern, methods, handler_id.clone())
            });
            if let Err(source) = methods {
                return Err(BuildError::InvalidPattern {
                    handler: handler_id,
                    source,
                });
            }

            routes.insert(
                handler_id.clone(),
                CompiledRoute {
                    handler_id,
                    content_type,
                    inject_request: route.inject_request,
                    schema: route.schema,
                    handler,
                },
            );
        }

        Ok(RouteTable { router, routes })
    }
}

/// A route ready to serve.
pub(crate) struct CompiledRoute {
    pub(crate) handler_id: String,
    pub(crate) content_type: String,
    pub(crate) inject_request: bool,
    pub(crate) schema: Schema,
    pub(crate) handler: ErasedHandler,
}

/// Router plus handler table, immutable once built.
pub(crate) struct RouteTable {
    pub(crate) router: Router,
    pub(crate) routes: HashMap<String, CompiledRoute>,
}

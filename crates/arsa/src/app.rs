//! The declaration surface.

use std::future::Future;
use std::sync::Arc;

use arsa_authz::{Authorizer, AuthorizerEvent, AuthzResult, PolicyDocument};
use arsa_config::ArsaConfig;
use arsa_core::{handler_fn, Arguments, Fault, Middleware, Output};
use arsa_schema::Attribute;
use arsa_telemetry::TelemetryError;
use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::error::BuildError;
use crate::registry::{Route, RouteRegistry};

/// Collects routes, middleware and the authorizer, then builds a
/// [`Dispatcher`].
///
/// Declarations can arrive in any order: the route for a handler is
/// created the first time the handler is named and amended afterwards.
///
/// # Example
///
/// ```
/// use arsa::prelude::*;
///
/// let mut app = App::new();
/// app.route("get_user", "/users/<int:id>", |args: Arguments| async move {
///     let id = args.get_i64("id").unwrap_or_default();
///     Ok::<_, Fault>(serde_json::json!({ "id": id }))
/// });
/// app.optional("get_user", "verbose", Attribute::boolean());
///
/// let dispatcher = app.build().unwrap();
/// assert_eq!(dispatcher.route_count(), 1);
/// ```
#[derive(Default)]
pub struct App {
    registry: RouteRegistry,
    middleware: Vec<Arc<dyn Middleware>>,
    authorizer: Authorizer,
    config: ArsaConfig,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.registry)
            .field("middleware", &self.middleware.len())
            .field("authorizer", &self.authorizer)
            .field("config", &self.config)
            .finish()
    }
}

impl App {
    /// Creates an empty application with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `config` instead of the defaults.
    #[must_use]
    pub fn with_config(mut self, config: ArsaConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration the dispatcher will be built with.
    #[must_use]
    pub fn config(&self) -> &ArsaConfig {
        &self.config
    }

    /// Installs the global log subscriber described by the `logging` section.
    ///
    /// Call once at cold start, before [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// Fails if the level directive is invalid or a subscriber is already set.
    pub fn init_logging(&self) -> Result<(), TelemetryError> {
        arsa_telemetry::init_logging(&self.config.logging.to_log_config())
    }

    /// The route declarations collected so far.
    #[must_use]
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Binds `pattern` and `handler` to `handler_id`.
    ///
    /// Methods default to `GET`. The returned [`Route`] can be amended
    /// further (`methods`, `content_type`, `inject_request`, `required`,
    /// `optional`).
    pub fn route<F, Fut, O>(
        &mut self,
        handler_id: impl Into<String>,
        pattern: impl Into<String>,
        handler: F,
    ) -> &mut Route
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, Fault>> + Send + 'static,
        O: Into<Output> + 'static,
    {
        self.registry
            .register(handler_id)
            .set_pattern(pattern)
            .set_handler(handler_fn(handler))
    }

    /// Returns the route for `handler_id`, creating it if needed.
    pub fn register(&mut self, handler_id: impl Into<String>) -> &mut Route {
        self.registry.register(handler_id)
    }

    /// Declares a required argument on `handler_id`'s route.
    pub fn required(
        &mut self,
        handler_id: impl Into<String>,
        name: impl Into<String>,
        attribute: Attribute,
    ) -> &mut Route {
        self.registry.register(handler_id).required(name, attribute)
    }

    /// Declares an optional argument on `handler_id`'s route.
    pub fn optional(
        &mut self,
        handler_id: impl Into<String>,
        name: impl Into<String>,
        attribute: Attribute,
    ) -> &mut Route {
        self.registry.register(handler_id).optional(name, attribute)
    }

    /// Appends a middleware step. Steps run in registration order.
    pub fn middleware(&mut self, middleware: impl Middleware) -> &mut Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Installs the custom authorizer decision function.
    pub fn authorizer<F>(&mut self, decision: F) -> &mut Self
    where
        F: Fn(&AuthorizerEvent) -> AuthzResult<PolicyDocument> + Send + Sync + 'static,
    {
        self.authorizer = std::mem::take(&mut self.authorizer).with_decision(decision);
        self
    }

    /// Freezes the declarations into a [`Dispatcher`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] for a route without pattern or handler, an
    /// invalid pattern, method or content type, or a reserved argument name.
    pub fn build(self) -> Result<Dispatcher, BuildError> {
        let table = self.registry.compile(&self.config.dispatch)?;
        debug!(
            routes = table.routes.len(),
            middleware = self.middleware.len(),
            custom_authorizer = self.authorizer.has_decision(),
            "dispatcher built"
        );
        Ok(Dispatcher::new(
            table,
            self.middleware,
            self.authorizer,
            self.config.dispatch,
        ))
    }
}

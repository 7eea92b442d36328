//! The request dispatch pipeline.
//!
//! ```text
//! Request → context scope → middleware → match → body → merge → validate
//!                                                                   ↓
//! Response ← serialize ← handler ←──────────────────────── decode ──┘
//! ```
//!
//! Every fault except [`Fault::Unhandled`] is mapped to a response in the
//! route's content type. Unhandled faults leave the pipeline as
//! [`DispatchError::Application`].

use std::collections::HashMap;
use std::sync::Arc;

use arsa_authz::{Authorizer, AuthorizerEvent, AuthorizerResponse, AuthzResult};
use arsa_config::DispatchConfig;
use arsa_core::{Arguments, Fault, Middleware, Request, RequestContext, RequestId, Response};
use arsa_router::{MatchError, Router};
use arsa_schema::{decode, validate};
use http::header::HOST;
use http::HeaderValue;
use tracing::{debug, info_span, warn, Instrument};

use crate::error::DispatchError;
use crate::merge::{merge_sources, parse_body};
use crate::registry::{CompiledRoute, RouteTable};
use crate::serialize::{render_fault, render_output};

/// Immutable dispatcher produced by [`App::build`](crate::App::build).
///
/// A dispatcher is `Send + Sync` and can serve any number of concurrent
/// invocations; each one runs in its own [`RequestContext`].
pub struct Dispatcher {
    router: Router,
    routes: HashMap<String, CompiledRoute>,
    middleware: Vec<Arc<dyn Middleware>>,
    authorizer: Authorizer,
    config: DispatchConfig,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes.len())
            .field(
                "middleware",
                &self.middleware.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("authorizer", &self.authorizer)
            .field("config", &self.config)
            .finish()
    }
}

/// Where the pipeline got to, for mapping faults.
struct Stage<'a> {
    content_type: &'a str,
    handler: Option<&'a str>,
}

impl Dispatcher {
    pub(crate) fn new(
        table: RouteTable,
        middleware: Vec<Arc<dyn Middleware>>,
        authorizer: Authorizer,
        config: DispatchConfig,
    ) -> Self {
        Self {
            router: table.router,
            routes: table.routes,
            middleware,
            authorizer,
            config,
        }
    }

    /// Dispatch settings in effect.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Number of routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// The configured authorizer.
    #[must_use]
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Builds the policy for a custom authorizer invocation.
    pub fn authorize(&self, event: &AuthorizerEvent) -> AuthzResult<AuthorizerResponse> {
        self.authorizer.authorize(event)
    }

    /// Dispatches one request.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Application`] when a handler or middleware
    /// fails with [`Fault::Unhandled`]. Every other outcome is a response.
    pub async fn dispatch(&self, request: Request) -> Result<Response, DispatchError> {
        let request = Arc::new(self.canonicalize(request));
        let ctx = RequestContext::new(Arc::clone(&request));
        let request_id = ctx.request_id();

        let span = info_span!(
            "dispatch",
            request_id = %request_id,
            http.method = %request.method(),
            http.path = request.path(),
        );

        ctx.scope(self.run(request_id, request).instrument(span))
            .await
    }

    fn canonicalize(&self, mut request: Request) -> Request {
        if !request.headers().contains_key(HOST) {
            if let Ok(host) = HeaderValue::from_str(&self.config.server_name) {
                request.headers_mut().insert(HOST, host);
            }
        }
        request
    }

    async fn run(
        &self,
        request_id: RequestId,
        request: Arc<Request>,
    ) -> Result<Response, DispatchError> {
        let mut stage = Stage {
            content_type: &self.config.default_content_type,
            handler: None,
        };

        let response = match self.pipeline(&request, &mut stage).await {
            Ok(response) => response,
            Err(Fault::Unhandled(source)) => {
                let handler = stage.handler.unwrap_or("<middleware>");
                arsa_telemetry::log_dispatch_fatal!(request_id, handler, source);
                return Err(DispatchError::Application {
                    handler: handler.to_string(),
                    request_id,
                    source,
                });
            }
            Err(fault) => {
                debug!(
                    fault = fault.name(),
                    http.status_code = fault.status_code().as_u16(),
                    "dispatch fault"
                );
                render_fault(&fault, stage.content_type)
            }
        };

        let elapsed = RequestContext::with(RequestContext::elapsed).unwrap_or_default();
        arsa_telemetry::log_dispatch_complete!(
            request_id,
            response.status().as_u16(),
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        );
        Ok(response)
    }

    async fn pipeline<'a>(
        &'a self,
        request: &Arc<Request>,
        stage: &mut Stage<'a>,
    ) -> Result<Response, Fault> {
        for middleware in &self.middleware {
            let outcome =
                RequestContext::with_mut(|ctx| middleware.process(ctx)).map_err(Fault::unhandled)?;
            if let Err(fault) = outcome {
                if !fault.is_fatal() {
                    warn!(middleware = middleware.name(), fault = %fault, "middleware aborted dispatch");
                }
                return Err(fault);
            }
        }

        let matched = self
            .router
            .match_route(request.method(), request.path())
            .map_err(|e| match e {
                MatchError::NotFound => Fault::RouteNotFound,
                MatchError::MethodNotAllowed { allowed } => Fault::MethodNotAllowed { allowed },
            })?;
        let route = self
            .routes
            .get(matched.endpoint)
            .ok_or(Fault::RouteNotFound)?;

        stage.content_type = &route.content_type;
        stage.handler = Some(&route.handler_id);
        RequestContext::with_mut(|ctx| ctx.set_handler(route.handler_id.as_str()))
            .map_err(Fault::unhandled)?;
        debug!(handler = %route.handler_id, pattern = %matched.pattern, "route matched");

        let body = parse_body(request, self.config.max_body_bytes)?;
        let merged = merge_sources(
            &matched.params,
            request,
            body,
            self.config.protect_path_variables,
        );

        validate(&route.handler_id, &merged, &route.schema)?;

        let mut arguments = Arguments::new(decode(&merged, &route.schema));
        if route.inject_request {
            arguments = arguments.with_request(Arc::clone(request));
        }

        let output = (route.handler)(arguments).await?;
        Ok(render_output(output, &route.content_type))
    }
}

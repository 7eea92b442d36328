//! Middleware run before routing.

use crate::context::RequestContext;
use crate::fault::Fault;

/// A step run on every invocation, in registration order, before routing.
///
/// Middleware works on the invocation's [`RequestContext`]. Returning a
/// fault stops the chain and the fault is mapped to a response.
///
/// # Example
///
/// ```
/// use arsa_core::{Fault, HttpFault, Middleware, RequestContext};
///
/// struct RequireApiKey;
///
/// impl Middleware for RequireApiKey {
///     fn name(&self) -> &'static str {
///         "require-api-key"
///     }
///
///     fn process(&self, ctx: &mut RequestContext) -> Result<(), Fault> {
///         let key = ctx.request().header("x-api-key").map(str::to_string);
///         match key {
///             Some(key) => {
///                 ctx.set("api_key", key);
///                 Ok(())
///             }
///             None => Err(HttpFault::unauthorized().into()),
///         }
///     }
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Runs the step.
    fn process(&self, ctx: &mut RequestContext) -> Result<(), Fault>;
}

/// Middleware built from a closure.
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware").field("name", &self.name).finish()
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut RequestContext) -> Result<(), Fault> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process(&self, ctx: &mut RequestContext) -> Result<(), Fault> {
        (self.func)(ctx)
    }
}

/// Creates middleware from a closure.
pub fn middleware_fn<F>(name: &'static str, func: F) -> FnMiddleware<F>
where
    F: Fn(&mut RequestContext) -> Result<(), Fault> + Send + Sync + 'static,
{
    FnMiddleware { name, func }
}

//! Invocation-scoped request context.
//!
//! Each dispatch runs inside [`RequestContext::scope`], which installs a
//! fresh context in a task-local cell for the lifetime of the invocation.
//! Concurrent invocations on other tasks never see each other's context,
//! and the context is dropped on every exit path when the scope ends.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};
use uuid::Uuid;

use crate::error::ContextError;
use crate::request::Request;

tokio::task_local! {
    static CURRENT: RefCell<RequestContext>;
}

/// A unique identifier for each invocation, using UUID v7.
///
/// # Example
///
/// ```
/// use arsa_core::RequestId;
///
/// let a = RequestId::new();
/// let b = RequestId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new time-ordered request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-invocation state: the request, an ambient bag and typed extensions.
///
/// Middleware receives `&mut RequestContext` directly. Handler code reaches
/// the active context through [`RequestContext::with`] and
/// [`RequestContext::with_mut`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use arsa_core::{Request, RequestContext};
///
/// # tokio_test::block_on(async {
/// let ctx = RequestContext::new(Arc::new(Request::builder().path("/users").build()));
///
/// let path = ctx
///     .scope(async {
///         RequestContext::with_mut(|ctx| ctx.set("user", "ann")).unwrap();
///         RequestContext::with(|ctx| ctx.request().path().to_string()).unwrap()
///     })
///     .await;
///
/// assert_eq!(path, "/users");
/// assert!(!RequestContext::is_active());
/// # });
/// ```
#[derive(Debug)]
pub struct RequestContext {
    request_id: RequestId,
    request: Arc<Request>,
    handler: Option<String>,
    bag: HashMap<String, Value>,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context for `request` with a fresh request ID.
    #[must_use]
    pub fn new(request: Arc<Request>) -> Self {
        Self::with_request_id(RequestId::new(), request)
    }

    /// Creates a context with a specific request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId, request: Arc<Request>) -> Self {
        Self {
            request_id,
            request,
            handler: None,
            bag: HashMap::new(),
            extensions: HashMap::new(),
            started_at: Instant::now(),
        }
    }

    /// Runs `fut` with this context installed as the current one.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        trace!(request_id = %self.request_id, "request context installed");
        CURRENT.scope(RefCell::new(self), fut).await
    }

    /// Returns true when called inside [`RequestContext::scope`].
    #[must_use]
    pub fn is_active() -> bool {
        CURRENT.try_with(|_| ()).is_ok()
    }

    /// Reads the current context.
    pub fn with<R>(f: impl FnOnce(&Self) -> R) -> Result<R, ContextError> {
        CURRENT
            .try_with(|cell| {
                let ctx = cell.try_borrow().map_err(|_| {
                    warn!("request context read while mutably borrowed");
                    ContextError::AlreadyBorrowed
                })?;
                Ok(f(&ctx))
            })
            .map_err(|_| ContextError::NoActiveContext)?
    }

    /// Mutates the current context.
    pub fn with_mut<R>(f: impl FnOnce(&mut Self) -> R) -> Result<R, ContextError> {
        CURRENT
            .try_with(|cell| {
                let mut ctx = cell.try_borrow_mut().map_err(|_| {
                    warn!("request context mutated while already borrowed");
                    ContextError::AlreadyBorrowed
                })?;
                Ok(f(&mut ctx))
            })
            .map_err(|_| ContextError::NoActiveContext)?
    }

    /// The invocation's request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// The canonical request.
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Shared handle to the canonical request.
    #[must_use]
    pub fn shared_request(&self) -> Arc<Request> {
        Arc::clone(&self.request)
    }

    /// The matched handler, once routing has run.
    #[must_use]
    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }

    /// Records the matched handler.
    pub fn set_handler(&mut self, handler: impl Into<String>) {
        self.handler = Some(handler.into());
    }

    /// When the invocation started.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time since the invocation started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Returns a value from the ambient bag.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.bag.get(key)
    }

    /// Stores a value in the ambient bag, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.bag.insert(key.into(), value.into())
    }

    /// Removes a value from the ambient bag.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.bag.remove(key)
    }

    /// The whole ambient bag.
    #[must_use]
    pub fn bag(&self) -> &HashMap<String, Value> {
        &self.bag
    }

    /// Stores a typed extension, replacing any previous value of that type.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns a typed extension.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    /// Removes a typed extension.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok())
            .map(|boxed| *boxed)
    }

    /// Returns true if an extension of type `T` is set.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(path: &str) -> RequestContext {
        RequestContext::new(Arc::new(Request::builder().path(path).build()))
    }

    #[test]
    fn test_outside_scope_is_error() {
        assert!(!RequestContext::is_active());
        assert_eq!(
            RequestContext::with(|_| ()),
            Err(ContextError::NoActiveContext)
        );
    }

    #[tokio::test]
    async fn test_scope_exposes_context() {
        let result = ctx("/a")
            .scope(async {
                assert!(RequestContext::is_active());
                RequestContext::with_mut(|c| c.set("n", 1)).unwrap();
                tokio::task::yield_now().await;
                RequestContext::with(|c| c.get("n").cloned()).unwrap()
            })
            .await;
        assert_eq!(result, Some(json!(1)));
    }

    #[tokio::test]
    async fn test_nested_borrow_is_rejected() {
        ctx("/a")
            .scope(async {
                let inner = RequestContext::with(|_| RequestContext::with_mut(|_| ())).unwrap();
                assert_eq!(inner, Err(ContextError::AlreadyBorrowed));

                let inner = RequestContext::with_mut(|_| RequestContext::with(|_| ())).unwrap();
                assert_eq!(inner, Err(ContextError::AlreadyBorrowed));
            })
            .await;
    }

    #[tokio::test]
    async fn test_concurrent_scopes_are_isolated() {
        let a = tokio::spawn(ctx("/a").scope(async {
            RequestContext::with_mut(|c| c.set("who", "a")).unwrap();
            tokio::task::yield_now().await;
            RequestContext::with(|c| (c.request().path().to_string(), c.get("who").cloned()))
                .unwrap()
        }));
        let b = tokio::spawn(ctx("/b").scope(async {
            tokio::task::yield_now().await;
            RequestContext::with(|c| (c.request().path().to_string(), c.get("who").cloned()))
                .unwrap()
        }));

        assert_eq!(a.await.unwrap(), ("/a".to_string(), Some(json!("a"))));
        assert_eq!(b.await.unwrap(), ("/b".to_string(), None));
    }

    #[test]
    fn test_extensions() {
        #[derive(Debug, PartialEq)]
        struct Tenant(&'static str);

        let mut ctx = ctx("/");
        assert!(!ctx.has_extension::<Tenant>());
        ctx.set_extension(Tenant("acme"));
        assert_eq!(ctx.get_extension::<Tenant>(), Some(&Tenant("acme")));
        assert_eq!(ctx.remove_extension::<Tenant>(), Some(Tenant("acme")));
        assert!(!ctx.has_extension::<Tenant>());
    }

    #[test]
    fn test_bag_and_handler() {
        let mut ctx = ctx("/");
        assert_eq!(ctx.set("k", "v"), None);
        assert_eq!(ctx.set("k", "w"), Some(json!("v")));
        assert_eq!(ctx.remove("k"), Some(json!("w")));
        assert!(ctx.bag().is_empty());

        assert!(ctx.handler().is_none());
        ctx.set_handler("get_user");
        assert_eq!(ctx.handler(), Some("get_user"));
    }
}

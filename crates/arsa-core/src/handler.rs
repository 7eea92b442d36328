//! Type-erased handlers and their arguments.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use arsa_schema::{Decoded, Instance};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::fault::Fault;
use crate::output::Output;
use crate::request::Request;

/// Result of a handler invocation.
pub type HandlerResult = Result<Output, Fault>;

/// A boxed, sendable future.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A type-erased handler function.
pub type ErasedHandler = Arc<dyn Fn(Arguments) -> BoxFuture<HandlerResult> + Send + Sync>;

/// Wraps an async function as an [`ErasedHandler`].
///
/// # Example
///
/// ```
/// use arsa_core::{handler_fn, Arguments, Fault};
///
/// let handler = handler_fn(|args: Arguments| async move {
///     let slug = args.get_str("slug").unwrap_or_default().to_string();
///     Ok::<_, Fault>(slug)
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut, O>(f: F) -> ErasedHandler
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, Fault>> + Send + 'static,
    O: Into<Output> + 'static,
{
    Arc::new(move |args: Arguments| -> BoxFuture<HandlerResult> {
        let fut = f(args);
        Box::pin(async move { fut.await.map(Into::into) })
    })
}

/// Decoded keyword arguments passed to a handler.
///
/// When a route asks for request injection, the canonical request is
/// available through [`Arguments::request`], under the reserved name
/// [`Arguments::REQUEST_ARGUMENT`].
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: IndexMap<String, Decoded>,
    request: Option<Arc<Request>>,
}

impl Arguments {
    /// Reserved argument name of the injected request.
    pub const REQUEST_ARGUMENT: &'static str = "arsa_request";

    /// Creates arguments from decoded values.
    #[must_use]
    pub fn new(values: IndexMap<String, Decoded>) -> Self {
        Self {
            values,
            request: None,
        }
    }

    /// Injects the canonical request.
    #[must_use]
    pub fn with_request(mut self, request: Arc<Request>) -> Self {
        self.request = Some(request);
        self
    }

    /// Returns an argument.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Decoded> {
        self.values.get(name)
    }

    /// Returns a string argument.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Decoded::as_str)
    }

    /// Returns an integer argument.
    #[must_use]
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Decoded::as_i64)
    }

    /// Returns a numeric argument.
    #[must_use]
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Decoded::as_f64)
    }

    /// Returns a boolean argument.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Decoded::as_bool)
    }

    /// Returns a model instance argument.
    #[must_use]
    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.get(name).and_then(Decoded::as_instance)
    }

    /// Returns a list argument.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[Decoded]> {
        self.get(name).and_then(Decoded::as_list)
    }

    /// Deserializes an argument into a typed value.
    ///
    /// A missing or ill-shaped argument is an unhandled fault: validated
    /// arguments always fit their declaration.
    pub fn parse<T: DeserializeOwned>(&self, name: &str) -> Result<T, Fault> {
        let value = self
            .get(name)
            .map(Decoded::to_value)
            .ok_or_else(|| Fault::unhandled(anyhow::anyhow!("argument '{name}' is absent")))?;
        serde_json::from_value(value).map_err(Fault::unhandled)
    }

    /// The injected request.
    #[must_use]
    pub fn request(&self) -> Option<&Request> {
        self.request.as_deref()
    }

    /// Returns true if the argument is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
            || (name == Self::REQUEST_ARGUMENT && self.request.is_some())
    }

    /// Iterates decoded arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Decoded)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of decoded arguments, excluding the injected request.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no decoded arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> Arguments {
        let mut values = IndexMap::new();
        values.insert("slug".to_string(), Decoded::Value(json!("bar")));
        values.insert("page".to_string(), Decoded::Value(json!(2)));
        values.insert(
            "tags".to_string(),
            Decoded::List(vec![Decoded::Value(json!("a"))]),
        );
        Arguments::new(values)
    }

    #[test]
    fn test_typed_getters() {
        let args = args();
        assert_eq!(args.get_str("slug"), Some("bar"));
        assert_eq!(args.get_i64("page"), Some(2));
        assert_eq!(args.list("tags").map(<[Decoded]>::len), Some(1));
        assert!(args.get("missing").is_none());
    }

    #[test]
    fn test_parse() {
        let tags: Vec<String> = args().parse("tags").unwrap();
        assert_eq!(tags, vec!["a"]);
        assert!(args().parse::<String>("missing").unwrap_err().is_fatal());
    }

    #[test]
    fn test_injected_request() {
        let args = args();
        assert!(!args.contains(Arguments::REQUEST_ARGUMENT));

        let request = Arc::new(Request::builder().path("/x").build());
        let args = args.with_request(request);
        assert!(args.contains(Arguments::REQUEST_ARGUMENT));
        assert_eq!(args.request().map(Request::path), Some("/x"));
        assert_eq!(args.len(), 3);
    }

    #[tokio::test]
    async fn test_handler_fn_converts_output() {
        let handler = handler_fn(|args: Arguments| async move {
            Ok::<_, Fault>(format!("hello {}", args.get_str("slug").unwrap_or("?")))
        });
        let output = handler(args()).await.unwrap();
        assert_eq!(output, Output::Text("hello bar".into()));
    }
}

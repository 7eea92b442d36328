//! Test client for in-process dispatch.

use std::sync::Arc;

use arsa::Dispatcher;
use bytes::Bytes;
use http::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::TestError;
use crate::request::TestRequestBuilder;
use crate::response::TestResponse;

/// Drives a [`Dispatcher`] without a provider runtime.
///
/// By default requests are handed to [`Dispatcher::dispatch`] directly.
/// [`TestClient::through_events`] sends them as proxy integration events
/// instead, so the event boundary is exercised too.
///
/// # Example
///
/// ```
/// use arsa::prelude::*;
/// use arsa_test::TestClient;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let mut app = App::new();
/// app.route("hello", "/hello/<name>", |args: Arguments| async move {
///     Ok::<_, Fault>(json!({ "hello": args.get_str("name") }))
/// });
///
/// let client = TestClient::new(app.build().unwrap());
/// client
///     .get("/hello/ann")
///     .send()
///     .await
///     .assert_json_eq(&json!({"hello": "ann"}));
/// # });
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TestClient {
    dispatcher: Arc<Dispatcher>,
    default_headers: Vec<(String, String)>,
    through_events: bool,
}

impl TestClient {
    /// Creates a test client that owns the dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::from_shared(Arc::new(dispatcher))
    }

    /// Creates a test client over a shared dispatcher.
    pub fn from_shared(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            default_headers: Vec::new(),
            through_events: false,
        }
    }

    /// Sends every request as a proxy integration event.
    pub fn through_events(mut self) -> Self {
        self.through_events = true;
        self
    }

    /// Adds a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The dispatcher under test.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Creates a GET request builder.
    pub fn get(&self, path: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, path)
    }

    /// Creates a POST request builder.
    pub fn post(&self, path: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, path)
    }

    /// Creates a PUT request builder.
    pub fn put(&self, path: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, path)
    }

    /// Creates a PATCH request builder.
    pub fn patch(&self, path: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, path)
    }

    /// Creates a DELETE request builder.
    pub fn delete(&self, path: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, path)
    }

    /// Creates a request builder with a custom method.
    pub fn request(&self, method: Method, path: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequestBuilder::new(method, path))
    }

    /// Answers a raw custom-authorizer event.
    pub fn authorize(&self, event: Value) -> Result<Value, TestError> {
        Ok(self.dispatcher.authorize_event(event)?)
    }

    async fn send_internal(&self, builder: TestRequestBuilder) -> Result<TestResponse, TestError> {
        if self.through_events {
            let event = builder.into_event()?;
            let response = self.dispatcher.handle_proxy_event(event).await?;
            TestResponse::from_proxy(response)
        } else {
            let request = builder.build()?;
            let response = self.dispatcher.dispatch(request).await?;
            Ok(response.into())
        }
    }
}

/// A request builder bound to a test client.
#[must_use]
#[derive(Debug)]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl<'a> TestClientRequest<'a> {
    fn new(client: &'a TestClient, builder: TestRequestBuilder) -> Self {
        let builder = client
            .default_headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value));
        Self { client, builder }
    }

    /// Appends a header to the request.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(mut self, content_type: impl AsRef<str>) -> Self {
        self.builder = self.builder.content_type(content_type);
        self
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_token(token);
        self
    }

    /// Appends a query parameter value.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets the request body as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sets the request body as form-urlencoded.
    pub fn form<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.form(value);
        self
    }

    /// Sends the request and returns the response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the handler fails with an
    /// unhandled fault. Use [`try_send`](Self::try_send) to inspect those.
    pub async fn send(self) -> TestResponse {
        self.try_send().await.expect("request should succeed")
    }

    /// Sends the request and returns a Result.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        self.client.send_internal(self.builder).await
    }
}

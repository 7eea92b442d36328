//! Test request building.

use arsa::lambda::ProxyEvent;
use arsa_core::{MultiMap, Request};
use bytes::Bytes;
use http::{header, HeaderName, HeaderValue, Method};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::TestError;

/// Entry points for building test requests.
///
/// # Example
///
/// ```
/// use arsa_test::TestRequest;
/// use serde_json::json;
///
/// let request = TestRequest::post("/users?notify=1")
///     .json(&json!({"name": "Alice"}))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path(), "/users");
/// assert_eq!(request.query().get("notify"), Some("1"));
/// assert_eq!(request.header("content-type"), Some("application/json"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TestRequest;

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(path: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, path)
    }

    /// Creates a new POST request.
    pub fn post(path: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, path)
    }

    /// Creates a new PUT request.
    pub fn put(path: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, path)
    }

    /// Creates a new PATCH request.
    pub fn patch(path: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, path)
    }

    /// Creates a new DELETE request.
    pub fn delete(path: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, path)
    }
}

/// Builder for constructing test requests.
///
/// Encoding and header failures surface from [`build`](Self::build).
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    form: Option<MultiMap>,
    body: Option<Bytes>,
    provider_context: Option<Value>,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    ///
    /// A query string in `path` is split off and parsed.
    pub fn new(method: Method, path: impl AsRef<str>) -> Self {
        let mut builder = Self {
            method,
            path: String::new(),
            headers: Vec::new(),
            query: Vec::new(),
            form: None,
            body: None,
            provider_context: None,
            error: None,
        };
        match path.as_ref().split_once('?') {
            Some((path, query)) => {
                builder.path = path.to_string();
                match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
                    Ok(pairs) => builder.query = pairs,
                    Err(e) => builder.fail(TestError::RequestBuild(format!("invalid query: {e}"))),
                }
            }
            None => builder.path = path.as_ref().to_string(),
        }
        builder
    }

    fn fail(&mut self, error: TestError) {
        self.error.get_or_insert(error);
    }

    /// Appends a header to the request.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.headers
            .push((name.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(
            header::AUTHORIZATION.as_str(),
            format!("Bearer {}", token.as_ref()),
        )
    }

    /// Appends a query parameter value. Repeating a key builds a multi-valued parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the request body as JSON.
    ///
    /// This also sets the `Content-Type` header to `application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Some(Bytes::from(bytes)),
            Err(e) => self.fail(e.into()),
        }
        self.content_type("application/json")
    }

    /// Sets the request body as form-urlencoded.
    ///
    /// This also sets the `Content-Type` header to
    /// `application/x-www-form-urlencoded` and fills the request's form fields.
    pub fn form<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => match MultiMap::from_urlencoded(&encoded) {
                Ok(fields) => {
                    self.form = Some(fields);
                    self.body = Some(Bytes::from(encoded));
                }
                Err(e) => self.fail(TestError::RequestBuild(format!("invalid form: {e}"))),
            },
            Err(e) => self.fail(TestError::RequestBuild(format!("invalid form: {e}"))),
        }
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Attaches a provider request context.
    pub fn provider_context(mut self, context: Value) -> Self {
        self.provider_context = Some(context);
        self
    }

    /// Builds the canonical request.
    pub fn build(self) -> Result<Request, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut builder = Request::builder().method(self.method).path(self.path);
        for (name, value) in &self.headers {
            HeaderName::try_from(name.as_str())
                .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
            HeaderValue::try_from(value.as_str())
                .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
            builder = builder.header(name, value);
        }
        for (key, value) in self.query {
            builder = builder.query_param(key, value);
        }
        if let Some(form) = self.form {
            builder = builder.form(form);
        }
        if let Some(body) = self.body {
            builder = builder.body(body);
        }
        if let Some(context) = self.provider_context {
            builder = builder.provider_context(context);
        }
        Ok(builder.build())
    }

    /// Builds a proxy integration event carrying the same request.
    ///
    /// Headers and query parameters are written to the multi-value maps.
    /// Bodies must be UTF-8.
    pub fn into_event(self) -> Result<ProxyEvent, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut event = ProxyEvent::new(self.method.as_str(), self.path);
        if !self.headers.is_empty() {
            event.multi_value_headers = Some(group(self.headers));
        }
        if !self.query.is_empty() {
            event.multi_value_query_string_parameters = Some(group(self.query));
        }
        if let Some(body) = self.body {
            let text = String::from_utf8(body.to_vec())
                .map_err(|e| TestError::RequestBuild(format!("event body is not UTF-8: {e}")))?;
            event = event.with_body(text);
        }
        event.request_context = self.provider_context;
        Ok(event)
    }
}

fn group(pairs: Vec<(String, String)>) -> IndexMap<String, Vec<String>> {
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for (key, value) in pairs {
        grouped.entry(key).or_default().push(value);
    }
    grouped
}

//! Canonical inbound request.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Ordered multi-valued string mapping used for query parameters and form fields.
///
/// # Example
///
/// ```rust
/// use arsa_core::MultiMap;
///
/// let query = MultiMap::from_urlencoded("tag=a&tag=b&page=2").unwrap();
/// assert_eq!(query.get_all("tag"), ["a", "b"]);
/// assert_eq!(query.get("page"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiMap {
    inner: IndexMap<String, Vec<String>>,
}

impl MultiMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` string.
    pub fn from_urlencoded(input: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input)?;
        Ok(pairs.into_iter().collect())
    }

    /// Appends a value for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Returns the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for `key`.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map_or(&[], Vec::as_slice)
    }

    /// Iterates keys with all their values, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Renders the map as JSON arguments: every key maps to a list of strings.
    #[must_use]
    pub fn to_arguments(&self) -> Map<String, Value> {
        self.inner
            .iter()
            .map(|(k, values)| {
                let list = values.iter().cloned().map(Value::String).collect();
                (k.clone(), Value::Array(list))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MultiMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.append(k, v);
        }
        map
    }
}

/// The canonical request handed to the dispatcher by a boundary adapter.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderMap,
    query: MultiMap,
    form: MultiMap,
    body: Option<Bytes>,
    provider_context: Option<Value>,
}

impl Request {
    /// Starts building a request.
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Multi-valued query parameters.
    #[must_use]
    pub fn query(&self) -> &MultiMap {
        &self.query
    }

    /// Multi-valued form fields.
    #[must_use]
    pub fn form(&self) -> &MultiMap {
        &self.form
    }

    /// Raw body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Raw provider request context, as received by the adapter.
    #[must_use]
    pub fn provider_context(&self) -> Option<&Value> {
        self.provider_context.as_ref()
    }

    /// Parsed `Content-Type` header.
    #[must_use]
    pub fn mime_type(&self) -> Option<mime::Mime> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    /// Returns true for `application/x-www-form-urlencoded` and `multipart/form-data` bodies.
    #[must_use]
    pub fn is_form(&self) -> bool {
        self.mime_type().is_some_and(|m| {
            m.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()
                || m.essence_str() == mime::MULTIPART_FORM_DATA.essence_str()
        })
    }
}

/// Builder for [`Request`].
///
/// Header names or values that are not valid HTTP are skipped.
///
/// # Example
///
/// ```rust
/// use arsa_core::Request;
/// use http::Method;
///
/// let request = Request::builder()
///     .method(Method::POST)
///     .path("/users")
///     .header("content-type", "application/json")
///     .body(r#"{"name":"ann"}"#)
///     .build();
///
/// assert_eq!(request.method(), Method::POST);
/// assert_eq!(request.header("content-type"), Some("application/json"));
/// ```
#[derive(Debug)]
#[must_use]
pub struct RequestBuilder {
    request: Request,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            request: Request {
                method: Method::GET,
                path: "/".to_string(),
                headers: HeaderMap::new(),
                query: MultiMap::new(),
                form: MultiMap::new(),
                body: None,
                provider_context: None,
            },
        }
    }
}

impl RequestBuilder {
    /// Sets the method.
    pub fn method(mut self, method: Method) -> Self {
        self.request.method = method;
        self
    }

    /// Sets the path. A query string, if present, is split off and parsed.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        match path.split_once('?') {
            Some((path, query)) => {
                if let Ok(parsed) = MultiMap::from_urlencoded(query) {
                    for (key, values) in parsed.iter() {
                        for value in values {
                            self.request.query.append(key, value.clone());
                        }
                    }
                }
                self.request.path = path.to_string();
            }
            None => self.request.path = path,
        }
        self
    }

    /// Appends a header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            self.request.headers.append(name, value);
        }
        self
    }

    /// Replaces all headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.request.headers = headers;
        self
    }

    /// Appends a query parameter value.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.append(key, value);
        self
    }

    /// Replaces the query parameters.
    pub fn query(mut self, query: MultiMap) -> Self {
        self.request.query = query;
        self
    }

    /// Appends a form field value.
    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.form.append(key, value);
        self
    }

    /// Replaces the form fields.
    pub fn form(mut self, form: MultiMap) -> Self {
        self.request.form = form;
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Attaches the provider request context.
    pub fn provider_context(mut self, context: Value) -> Self {
        self.request.provider_context = Some(context);
        self
    }

    /// Finishes the request.
    pub fn build(self) -> Request {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multimap_keeps_all_values_in_order() {
        let map: MultiMap = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_all("a"), ["1", "3"]);
        assert_eq!(map.get("a"), Some("1"));
        assert!(map.get_all("missing").is_empty());
    }

    #[test]
    fn test_multimap_from_urlencoded_decodes() {
        let map = MultiMap::from_urlencoded("name=J%C3%BCrgen&q=a+b").unwrap();
        assert_eq!(map.get("name"), Some("Jürgen"));
        assert_eq!(map.get("q"), Some("a b"));
    }

    #[test]
    fn test_multimap_to_arguments() {
        let map: MultiMap = [("tag", "x")].into_iter().collect();
        assert_eq!(
            Value::Object(map.to_arguments()),
            serde_json::json!({"tag": ["x"]})
        );
    }

    #[test]
    fn test_builder_splits_query_string() {
        let request = Request::builder().path("/search?q=rust&q=go").build();
        assert_eq!(request.path(), "/search");
        assert_eq!(request.query().get_all("q"), ["rust", "go"]);
    }

    #[test]
    fn test_is_form() {
        let form = Request::builder()
            .header("content-type", "application/x-www-form-urlencoded; charset=utf-8")
            .build();
        assert!(form.is_form());

        let multipart = Request::builder()
            .header("content-type", "multipart/form-data; boundary=x")
            .build();
        assert!(multipart.is_form());

        let json = Request::builder()
            .header("content-type", "application/json")
            .build();
        assert!(!json.is_form());
        assert!(!Request::builder().build().is_form());
    }

    #[test]
    fn test_invalid_header_is_skipped() {
        let request = Request::builder().header("bad header", "x").build();
        assert!(request.headers().is_empty());
    }
}

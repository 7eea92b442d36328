//! Proxy-integration event boundary.
//!
//! Translates a gateway proxy event into the canonical [`Request`] and the
//! canonical [`Response`] back into the proxy envelope
//! `{"statusCode", "headers", "body"}`.

use arsa_authz::AuthorizerEvent;
use arsa_core::{MultiMap, Request, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatcher::Dispatcher;
use crate::error::LambdaError;

/// An inbound proxy-integration event.
///
/// Multi-value headers and query parameters take precedence over their
/// single-value counterparts when both are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
    /// Request path.
    #[serde(default = "root_path")]
    pub path: String,
    /// HTTP method.
    pub http_method: String,
    /// Single-value headers.
    #[serde(default)]
    pub headers: Option<IndexMap<String, String>>,
    /// Multi-value headers.
    #[serde(default)]
    pub multi_value_headers: Option<IndexMap<String, Vec<String>>>,
    /// Single-value query parameters.
    #[serde(default)]
    pub query_string_parameters: Option<IndexMap<String, String>>,
    /// Multi-value query parameters.
    #[serde(default)]
    pub multi_value_query_string_parameters: Option<IndexMap<String, Vec<String>>>,
    /// Raw body.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
    /// Provider request context, kept verbatim.
    #[serde(default)]
    pub request_context: Option<Value>,
}

fn root_path() -> String {
    "/".to_string()
}

impl ProxyEvent {
    /// Creates an event with no headers, query or body.
    #[must_use]
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            http_method: http_method.into(),
            ..Self::default()
        }
    }

    /// Adds a single-value header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Adds a single-value query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets a text body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Converts the event into the canonical request.
    ///
    /// Form-encoded bodies are parsed into the request's form fields and
    /// also kept as the raw body. Headers that are not valid HTTP are
    /// dropped.
    pub fn into_request(self) -> Result<Request, LambdaError> {
        let method = Method::from_bytes(self.http_method.to_ascii_uppercase().as_bytes())
            .map_err(|_| LambdaError::InvalidMethod(self.http_method.clone()))?;

        let headers = header_map(self.multi_value_headers, self.headers);
        let urlencoded = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<mime::Mime>().ok())
            .is_some_and(|m| {
                m.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()
            });

        let query: MultiMap = pairs(
            self.multi_value_query_string_parameters,
            self.query_string_parameters,
        )
        .into_iter()
        .collect();

        let body = match self.body {
            Some(body) if self.is_base64_encoded => Some(STANDARD.decode(body)?),
            Some(body) => Some(body.into_bytes()),
            None => None,
        };

        let mut builder = Request::builder()
            .method(method)
            .path(self.path)
            .headers(headers);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(context) = self.request_context {
            builder = builder.provider_context(context);
        }
        if let Some(body) = body {
            if urlencoded {
                builder = builder.form(MultiMap::from_urlencoded(&String::from_utf8_lossy(&body))?);
            }
            builder = builder.body(body);
        }

        Ok(builder.build())
    }
}

// Multi-value maps win over single-value maps when both are present.
fn pairs(
    multi: Option<IndexMap<String, Vec<String>>>,
    single: Option<IndexMap<String, String>>,
) -> Vec<(String, String)> {
    match (multi, single) {
        (Some(multi), _) => multi
            .into_iter()
            .flat_map(|(k, vs)| vs.into_iter().map(move |v| (k.clone(), v)))
            .collect(),
        (None, Some(single)) => single.into_iter().collect(),
        (None, None) => Vec::new(),
    }
}

fn header_map(
    multi: Option<IndexMap<String, Vec<String>>>,
    single: Option<IndexMap<String, String>>,
) -> HeaderMap {
    let entries = pairs(multi, single);
    let mut headers = HeaderMap::with_capacity(entries.len());
    for (name, value) in entries {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            headers.append(name, value);
        }
    }
    headers
}

/// The proxy-integration response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers. Repeated headers are joined with `,`.
    pub headers: IndexMap<String, String>,
    /// Body text, base64 encoded when the body is not UTF-8.
    pub body: String,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl From<Response> for ProxyResponse {
    fn from(response: Response) -> Self {
        let (status, headers, body) = response.into_parts();

        let mut joined: IndexMap<String, String> = IndexMap::new();
        for (name, value) in &headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            joined
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        let (body, is_base64_encoded) = match String::from_utf8(body.to_vec()) {
            Ok(text) => (text, false),
            Err(_) => (STANDARD.encode(&body), true),
        };

        Self {
            status_code: status.as_u16(),
            headers: joined,
            body,
            is_base64_encoded,
        }
    }
}

impl Dispatcher {
    /// Dispatches a typed proxy event.
    ///
    /// # Errors
    ///
    /// Returns [`LambdaError`] for events that cannot be converted and for
    /// unhandled application faults.
    pub async fn handle_proxy_event(&self, event: ProxyEvent) -> Result<ProxyResponse, LambdaError> {
        let request = event.into_request()?;
        let response = self.dispatch(request).await?;
        Ok(response.into())
    }

    /// Dispatches a raw JSON proxy event and returns the raw JSON envelope.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::handle_proxy_event`].
    pub async fn handle_event(&self, event: Value) -> Result<Value, LambdaError> {
        let event: ProxyEvent = serde_json::from_value(event)?;
        let response = self.handle_proxy_event(event).await?;
        Ok(serde_json::to_value(response)?)
    }

    /// Answers a raw JSON custom-authorizer event.
    ///
    /// # Errors
    ///
    /// Returns [`LambdaError`] for malformed events or a failing decision.
    pub fn authorize_event(&self, event: Value) -> Result<Value, LambdaError> {
        let event: AuthorizerEvent = serde_json::from_value(event)?;
        let response = self.authorize(&event)?;
        Ok(serde_json::to_value(response)?)
    }
}

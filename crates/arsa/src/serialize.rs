//! Rendering of handler output and faults into responses.

use arsa_core::{Fault, Output, Response};
use bytes::Bytes;
use http::header::{ALLOW, LOCATION};
use http::{HeaderValue, StatusCode};
use serde_json::Value;
use tracing::warn;

/// Returns true for `application/json` and `*/*+json` content types.
pub(crate) fn is_json(content_type: &str) -> bool {
    content_type.parse::<mime::Mime>().is_ok_and(|m| {
        m.essence_str() == mime::APPLICATION_JSON.essence_str()
            || m.suffix().is_some_and(|s| s == mime::JSON)
    })
}

/// Renders a successful handler result.
///
/// JSON routes serialize the output: model instances as their attribute
/// mapping, text as a JSON string, and bytes through their string form.
/// Other content types receive the output verbatim.
pub(crate) fn render_output(output: Output, content_type: &str) -> Response {
    let body: Bytes = if is_json(content_type) {
        let value = match output {
            Output::Json(value) => value,
            Output::Model(instance) => instance.to_value(),
            Output::Text(text) => Value::String(text),
            Output::Bytes(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
            Output::Empty => Value::Null,
        };
        value.to_string().into()
    } else {
        match output {
            Output::Json(Value::String(text)) | Output::Text(text) => text.into(),
            Output::Json(value) => value.to_string().into(),
            Output::Model(instance) => instance.to_value().to_string().into(),
            Output::Bytes(bytes) => bytes,
            Output::Empty => Bytes::new(),
        }
    };

    Response::new(StatusCode::OK)
        .with_content_type(content_type)
        .with_body(body)
}

/// Renders a fault that the dispatcher resolves locally.
///
/// `405` responses list the allowed methods in `Allow`; redirects carry
/// `Location`.
pub(crate) fn render_fault(fault: &Fault, content_type: &str) -> Response {
    let mut response = Response::new(fault.status_code())
        .with_content_type(content_type)
        .with_body(fault.to_body().to_string());

    match fault {
        Fault::MethodNotAllowed { allowed } => {
            if let Ok(value) = HeaderValue::from_str(&allowed.allow_header()) {
                response.headers_mut().insert(ALLOW, value);
            }
        }
        Fault::Redirect(redirect) => match HeaderValue::from_str(redirect.location()) {
            Ok(value) => {
                response.headers_mut().insert(LOCATION, value);
            }
            Err(_) => warn!(location = redirect.location(), "redirect location is not a valid header value"),
        },
        _ => {}
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use arsa_core::{AppFault, Redirect};
    use arsa_router::MethodSet;
    use arsa_schema::{decode_model, Attribute, ModelSchema};
    use serde_json::json;

    #[test]
    fn test_is_json() {
        assert!(is_json("application/json"));
        assert!(is_json("application/json; charset=utf-8"));
        assert!(is_json("application/problem+json"));
        assert!(!is_json("text/html"));
        assert!(!is_json("not a type"));
    }

    #[test]
    fn test_render_json_value() {
        let response = render_output(Output::Json(json!({"ok": true})), "application/json");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.body_text(), r#"{"ok":true}"#);
    }

    #[test]
    fn test_render_model_as_mapping() {
        let model = ModelSchema::builder("User")
            .required("name", Attribute::string())
            .build();
        let instance = decode_model(&model, json!({"name": "ann"}).as_object().unwrap());

        let response = render_output(Output::Model(instance), "application/json");
        assert_eq!(response.body_text(), r#"{"name":"ann"}"#);
    }

    #[test]
    fn test_render_text_under_json_is_quoted() {
        let response = render_output(Output::Text("bar".into()), "application/json");
        assert_eq!(response.body_text(), r#""bar""#);

        let response = render_output(Output::Empty, "application/json");
        assert_eq!(response.body_text(), "null");
    }

    #[test]
    fn test_render_other_content_type_verbatim() {
        let response = render_output(Output::Text("<h1>hi</h1>".into()), "text/html");
        assert_eq!(response.content_type(), Some("text/html"));
        assert_eq!(response.body_text(), "<h1>hi</h1>");

        let response = render_output(Output::Json(json!("plain")), "text/plain");
        assert_eq!(response.body_text(), "plain");
    }

    #[test]
    fn test_render_method_not_allowed() {
        let allowed = MethodSet::parse(["GET", "PUT"]).unwrap();
        let response = render_fault(&Fault::MethodNotAllowed { allowed }, "application/json");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.header_str("allow"), Some("GET, PUT"));
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "Method Not Allowed");
    }

    #[test]
    fn test_render_redirect() {
        let response = render_fault(&Redirect::to("/login").into(), "application/json");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.header_str("location"), Some("/login"));
        assert_eq!(response.body_text(), r#"{"location":"/login"}"#);
    }

    #[test]
    fn test_render_registered_fault() {
        let fault: Fault = AppFault::new("QuotaExceeded", "too many requests")
            .with_status(StatusCode::TOO_MANY_REQUESTS)
            .into();
        let response = render_fault(&fault, "application/json");

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body, json!({"error": "QuotaExceeded", "description": "too many requests"}));
    }
}

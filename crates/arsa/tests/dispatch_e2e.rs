//! End-to-end dispatch tests.

use std::sync::Arc;

use arsa::prelude::*;
use http::{Method, StatusCode};
use serde_json::{json, Value};

fn get(path: &str) -> Request {
    Request::builder().method(Method::GET).path(path).build()
}

fn post_json(path: &str, body: &str) -> Request {
    Request::builder()
        .method(Method::POST)
        .path(path)
        .header("content-type", "application/json")
        .body(body.to_string())
        .build()
}

fn body_json(response: &Response) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

fn foobar_app() -> Dispatcher {
    let mut app = App::new();
    app.route("foobar", "/foobar/<slug>", |args: Arguments| async move {
        Ok::<_, Fault>(json!({ "slug": args.get_str("slug") }))
    });
    app.route("typed", "/typed/<int:slug>", |args: Arguments| async move {
        Ok::<_, Fault>(json!({ "slug": args.get_i64("slug") }))
    });
    app.build().unwrap()
}

#[tokio::test]
async fn test_string_variable_reaches_handler() {
    let response = foobar_app().dispatch(get("/foobar/bar")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.content_type(), Some("application/json"));
    assert_eq!(body_json(&response), json!({"slug": "bar"}));
}

#[tokio::test]
async fn test_converter_failure_is_not_found() {
    let dispatcher = foobar_app();

    let response = dispatcher.dispatch(get("/typed/bar")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(&response)["error"], "Not Found");

    let response = dispatcher.dispatch(get("/typed/42")).await.unwrap();
    assert_eq!(body_json(&response), json!({"slug": 42}));
}

#[tokio::test]
async fn test_unregistered_path_is_not_found_for_every_method() {
    let dispatcher = foobar_app();

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let request = Request::builder().method(method).path("/nowhere").build();
        let response = dispatcher.dispatch(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_wrong_method_is_method_not_allowed() {
    let response = foobar_app()
        .dispatch(post_json("/foobar/bar", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.header_str("allow"), Some("GET"));
}

fn accounts_app() -> Dispatcher {
    let tag = ModelSchema::builder("Tag")
        .required("name", Attribute::string())
        .build();
    let owner = ModelSchema::builder("Owner")
        .required("name", Attribute::string())
        .optional("email", Attribute::string())
        .build();

    let mut app = App::new();
    app.route("create_account", "/accounts", |args: Arguments| async move {
        let owner = args.instance("owner").map(Instance::to_value);
        Ok::<_, Fault>(json!({
            "owner": owner,
            "tags": args.list("tags").map(<[Decoded]>::len),
            "has_note": args.contains("note"),
        }))
    })
    .methods(["post"])
    .required("owner", Attribute::nested(owner))
    .optional("tags", Attribute::list_of(Attribute::nested(tag)))
    .optional("note", Attribute::string());
    app.build().unwrap()
}

#[tokio::test]
async fn test_malformed_body_is_rejected_before_validation() {
    let response = accounts_app()
        .dispatch(post_json("/accounts", "{}}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(&response),
        json!({"error": "Bad Request", "description": "JSON body was malformed"})
    );
}

#[tokio::test]
async fn test_missing_required_field_names_its_path() {
    let response = accounts_app()
        .dispatch(post_json("/accounts", r#"{"owner": {}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(&response)["description"],
        "argument create_account.owner.name was not detected"
    );
}

#[tokio::test]
async fn test_list_element_failure_names_its_index() {
    let response = accounts_app()
        .dispatch(post_json(
            "/accounts",
            r#"{"owner": {"name": "ann"}, "tags": [{"name": "a"}, {"bad": "x"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let description = body_json(&response)["description"].as_str().unwrap().to_string();
    assert!(description.contains("create_account.tags.1.name"));
}

#[tokio::test]
async fn test_type_mismatch_names_expected_type() {
    let response = accounts_app()
        .dispatch(post_json("/accounts", r#"{"owner": {"name": 7}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let description = body_json(&response)["description"].as_str().unwrap().to_string();
    assert!(description.starts_with("argument create_account.owner.name was not of the type string"));
}

#[tokio::test]
async fn test_optional_fields_may_be_absent() {
    let response = accounts_app()
        .dispatch(post_json("/accounts", r#"{"owner": {"name": "ann", "extra": 1}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(&response),
        json!({"owner": {"name": "ann"}, "tags": null, "has_note": false})
    );
}

#[tokio::test]
async fn test_query_values_collapse_for_scalar_fields() {
    let mut app = App::new();
    app.route("search", "/search", |args: Arguments| async move {
        Ok::<_, Fault>(json!({
            "term": args.get_str("term"),
            "tags": args.list("tag").map(<[Decoded]>::len),
        }))
    })
    .required("term", Attribute::string())
    .optional("tag", Attribute::list_of(Attribute::string()));
    let dispatcher = app.build().unwrap();

    let response = dispatcher
        .dispatch(get("/search?term=rust&tag=a&tag=b"))
        .await
        .unwrap();
    assert_eq!(body_json(&response), json!({"term": "rust", "tags": 2}));

    let response = dispatcher.dispatch(get("/search?tag=a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_form_fields_are_arguments() {
    let mut app = App::new();
    app.route("login", "/login", |args: Arguments| async move {
        Ok::<_, Fault>(args.get_str("user").unwrap_or_default().to_string())
    })
    .methods(["POST"])
    .required("user", Attribute::string());
    let dispatcher = app.build().unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .path("/login")
        .header("content-type", "application/x-www-form-urlencoded")
        .form_field("user", "ann")
        .body("user=ann")
        .build();

    let response = dispatcher.dispatch(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body_text(), r#""ann""#);
}

fn shadow_app(config: ArsaConfig) -> Dispatcher {
    let mut app = App::new().with_config(config);
    app.route("item", "/items/<int:id>", |args: Arguments| async move {
        Ok::<_, Fault>(json!({ "id": args.get_i64("id") }))
    })
    .methods(["PUT"]);
    app.build().unwrap()
}

#[tokio::test]
async fn test_body_overrides_path_variable_by_default() {
    let request = Request::builder()
        .method(Method::PUT)
        .path("/items/1")
        .header("content-type", "application/json")
        .body(r#"{"id": 2}"#)
        .build();

    let response = shadow_app(ArsaConfig::default()).dispatch(request).await.unwrap();
    assert_eq!(body_json(&response), json!({"id": 2}));
}

#[tokio::test]
async fn test_path_variables_can_be_protected() {
    let request = Request::builder()
        .method(Method::PUT)
        .path("/items/1")
        .header("content-type", "application/json")
        .body(r#"{"id": 2}"#)
        .build();

    let response = shadow_app(ArsaConfig::production()).dispatch(request).await.unwrap();
    assert_eq!(body_json(&response), json!({"id": 1}));
}

#[tokio::test]
async fn test_body_over_limit_is_rejected() {
    let mut config = ArsaConfig::default();
    config.dispatch.max_body_bytes = 16;

    let mut app = App::new().with_config(config);
    app.route("upload", "/upload", |_args: Arguments| async { Ok::<_, Fault>(()) })
        .methods(["POST"]);
    let dispatcher = app.build().unwrap();

    let response = dispatcher
        .dispatch(post_json("/upload", r#"{"data": "0123456789abcdef"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_redirect_sets_location() {
    let mut app = App::new();
    app.route("old", "/old", |_args: Arguments| async {
        Err::<(), _>(Redirect::to("https://arsa.io/new").into())
    });
    let dispatcher = app.build().unwrap();

    let response = dispatcher.dispatch(get("/old")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.header_str("location"), Some("https://arsa.io/new"));
    assert_eq!(body_json(&response), json!({"location": "https://arsa.io/new"}));
}

#[tokio::test]
async fn test_registered_and_http_faults() {
    let mut app = App::new();
    app.route("quota", "/quota", |_args: Arguments| async {
        Err::<(), _>(
            AppFault::new("QuotaExceeded", "Monthly quota used up")
                .with_status(StatusCode::TOO_MANY_REQUESTS)
                .with_details(json!({"limit": 100}))
                .into(),
        )
    });
    app.route("secret", "/secret", |_args: Arguments| async {
        Err::<(), _>(HttpFault::forbidden().into())
    });
    let dispatcher = app.build().unwrap();

    let response = dispatcher.dispatch(get("/quota")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body_json(&response),
        json!({
            "error": "QuotaExceeded",
            "description": "Monthly quota used up",
            "details": {"limit": 100}
        })
    );

    let response = dispatcher.dispatch(get("/secret")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(&response)["error"], "Forbidden");
}

#[tokio::test]
async fn test_unhandled_fault_propagates() {
    let mut app = App::new();
    app.route("boom", "/boom", |_args: Arguments| async {
        Err::<(), _>(Fault::unhandled(anyhow::anyhow!("database unreachable")))
    });
    let dispatcher = app.build().unwrap();

    let err = dispatcher.dispatch(get("/boom")).await.unwrap_err();
    let DispatchError::Application { handler, source, .. } = err;
    assert_eq!(handler, "boom");
    assert_eq!(source.to_string(), "database unreachable");
}

#[tokio::test]
async fn test_text_content_type_is_verbatim() {
    let mut app = App::new();
    app.route("page", "/page", |_args: Arguments| async {
        Ok::<_, Fault>("<h1>hello</h1>")
    })
    .content_type("text/html");
    let dispatcher = app.build().unwrap();

    let response = dispatcher.dispatch(get("/page")).await.unwrap();
    assert_eq!(response.content_type(), Some("text/html"));
    assert_eq!(response.body_text(), "<h1>hello</h1>");
}

#[tokio::test]
async fn test_request_injection() {
    let mut app = App::new();
    app.route("whoami", "/whoami", |args: Arguments| async move {
        let request = args.request().expect("request is injected");
        Ok::<_, Fault>(json!({
            "agent": request.header("user-agent"),
            "host": request.header("host"),
        }))
    })
    .inject_request();
    let dispatcher = app.build().unwrap();

    let request = Request::builder()
        .path("/whoami")
        .header("user-agent", "tests")
        .build();
    let response = dispatcher.dispatch(request).await.unwrap();
    assert_eq!(body_json(&response), json!({"agent": "tests", "host": "arsa.io"}));
}

#[tokio::test]
async fn test_middleware_runs_in_order_and_can_abort() {
    let mut app = App::new();
    app.middleware(middleware_fn("first", |ctx| {
        ctx.set("trail", "first");
        Ok(())
    }));
    app.middleware(middleware_fn("second", |ctx| {
        let trail = ctx.get("trail").and_then(Value::as_str).unwrap_or_default();
        let trail = format!("{trail},second");
        ctx.set("trail", trail);
        if ctx.request().header("x-block").is_some() {
            return Err(HttpFault::unauthorized().into());
        }
        Ok(())
    }));
    app.route("trail", "/trail", |_args: Arguments| async {
        let trail = RequestContext::with(|ctx| ctx.get("trail").cloned())
            .map_err(Fault::unhandled)?;
        Ok::<_, Fault>(json!({ "trail": trail }))
    });
    let dispatcher = app.build().unwrap();

    let response = dispatcher.dispatch(get("/trail")).await.unwrap();
    assert_eq!(body_json(&response), json!({"trail": "first,second"}));

    let blocked = Request::builder().path("/trail").header("x-block", "1").build();
    let response = dispatcher.dispatch(blocked).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Middleware faults happen before routing, so unknown paths get them too.
    let blocked = Request::builder().path("/nowhere").header("x-block", "1").build();
    let response = dispatcher.dispatch(blocked).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_invocations_keep_separate_contexts() {
    let mut app = App::new();
    app.middleware(middleware_fn("user", |ctx| {
        let user = ctx.request().header("x-user").unwrap_or("anonymous").to_string();
        ctx.set("user", user);
        Ok(())
    }));
    app.route("me", "/me", |_args: Arguments| async {
        tokio::task::yield_now().await;
        let user = RequestContext::with(|ctx| ctx.get("user").cloned())
            .map_err(Fault::unhandled)?;
        Ok::<_, Fault>(json!({ "user": user }))
    });
    let dispatcher = Arc::new(app.build().unwrap());

    let request = |user: &str| Request::builder().path("/me").header("x-user", user).build();

    let (a, b) = tokio::join!(
        dispatcher.dispatch(request("ann")),
        dispatcher.dispatch(request("bob")),
    );
    assert_eq!(body_json(&a.unwrap()), json!({"user": "ann"}));
    assert_eq!(body_json(&b.unwrap()), json!({"user": "bob"}));

    let spawned = {
        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move { dispatcher.dispatch(request("cy")).await })
    };
    let response = spawned.await.unwrap().unwrap();
    assert_eq!(body_json(&response), json!({"user": "cy"}));
    assert!(!RequestContext::is_active());
}

#[tokio::test]
async fn test_proxy_event_round_trip() {
    let dispatcher = foobar_app();

    let event = json!({
        "path": "/foobar/bar",
        "httpMethod": "GET",
        "headers": {"Accept": "application/json"},
        "queryStringParameters": null,
        "body": null,
        "requestContext": {"stage": "v1"}
    });

    let envelope = dispatcher.handle_event(event).await.unwrap();
    assert_eq!(envelope["statusCode"], 200);
    assert_eq!(envelope["headers"]["content-type"], "application/json");
    let body: Value = serde_json::from_str(envelope["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, json!({"slug": "bar"}));
}

#[tokio::test]
async fn test_proxy_event_unhandled_fault_is_an_error() {
    let mut app = App::new();
    app.route("boom", "/boom", |_args: Arguments| async {
        Err::<(), _>(Fault::unhandled(anyhow::anyhow!("kaput")))
    });
    let dispatcher = app.build().unwrap();

    let result = dispatcher
        .handle_proxy_event(ProxyEvent::new("GET", "/boom"))
        .await;
    assert!(matches!(result, Err(LambdaError::Dispatch(_))));
}

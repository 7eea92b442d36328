//! # Arsa Test
//!
//! Test utilities for Arsa applications: build a [`Dispatcher`](arsa::Dispatcher)
//! and drive it in-process, either with canonical requests or through the
//! proxy integration event boundary.
//!
//! ## Example
//!
//! ```
//! use arsa::prelude::*;
//! use arsa_test::TestClient;
//! use http::StatusCode;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let mut app = App::new();
//! app.route("signup", "/signup", |args: Arguments| async move {
//!     Ok::<_, Fault>(json!({ "name": args.get_str("name") }))
//! })
//! .methods(["POST"])
//! .required("name", Attribute::string());
//!
//! let client = TestClient::new(app.build().unwrap());
//!
//! client
//!     .post("/signup")
//!     .json(&json!({}))
//!     .send()
//!     .await
//!     .assert_fault(StatusCode::BAD_REQUEST, "argument signup.name was not detected");
//! # });
//! ```

#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;

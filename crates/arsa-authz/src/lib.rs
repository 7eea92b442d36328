//! Custom authorizer support for Arsa.
//!
//! A gateway custom authorizer receives an identity token and the ARN of
//! the invoked method, and answers with a policy document. This crate
//! builds that document:
//!
//! - [`PolicyDocument::from_event`] gives the default decision (allow, with
//!   the token as principal)
//! - [`generalize_resource`] widens the method ARN to `…/stage/*/*` so one
//!   decision covers the whole proxied route tree
//! - [`Authorizer`] applies an optional application decision function
//!
//! # Example
//!
//! ```
//! use arsa_authz::{Authorizer, AuthorizerEvent};
//!
//! let event = AuthorizerEvent::new(
//!     "token-abc",
//!     "arn:aws:execute-api:us-east-1:123456789012:ymy8tbxw7b/v1/GET/{proxy+}",
//! );
//! let response = Authorizer::new().authorize(&event).unwrap();
//!
//! assert_eq!(response.principal_id, "token-abc");
//! assert!(response.policy_document.statement[0].resource.ends_with("/*/*"));
//! ```

mod authorizer;
mod error;
mod policy;

pub use authorizer::{Authorizer, DecisionFn};
pub use error::{AuthzError, AuthzResult};
pub use policy::{
    generalize_resource, AuthorizerEvent, AuthorizerResponse, Effect, PolicyBody,
    PolicyDocument, Statement, INVOKE_ACTION, POLICY_VERSION,
};

//! Custom authorizer entry point.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::AuthzResult;
use crate::policy::{AuthorizerEvent, AuthorizerResponse, PolicyDocument};

/// Application-supplied decision function.
pub type DecisionFn = Arc<dyn Fn(&AuthorizerEvent) -> AuthzResult<PolicyDocument> + Send + Sync>;

/// Builds policy documents for gateway custom-authorizer invocations.
///
/// Without a decision function every token is allowed on the generalized
/// resource, with the token as principal. A configured decision function
/// returns the whole document and overrides the default entirely.
///
/// # Example
///
/// ```
/// use arsa_authz::{AuthorizerEvent, Authorizer, Effect, PolicyDocument};
///
/// let authorizer = Authorizer::new().with_decision(|event| {
///     let policy = PolicyDocument::from_event(event)?;
///     Ok(if event.authorization_token == "letmein" {
///         policy.with_principal("admin")
///     } else {
///         policy.deny()
///     })
/// });
///
/// let event = AuthorizerEvent::new("nope", "arn:aws:execute-api:r:1:api/v1/GET/x");
/// assert_eq!(authorizer.decide(&event).unwrap().effect(), Effect::Deny);
/// ```
#[derive(Clone, Default)]
pub struct Authorizer {
    decision: Option<DecisionFn>,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("custom_decision", &self.decision.is_some())
            .finish()
    }
}

impl Authorizer {
    /// Creates an authorizer with the default decision.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a decision function.
    #[must_use]
    pub fn with_decision<F>(mut self, decision: F) -> Self
    where
        F: Fn(&AuthorizerEvent) -> AuthzResult<PolicyDocument> + Send + Sync + 'static,
    {
        self.decision = Some(Arc::new(decision));
        self
    }

    /// Returns true if a decision function is installed.
    #[must_use]
    pub fn has_decision(&self) -> bool {
        self.decision.is_some()
    }

    /// Produces the policy document for `event`.
    pub fn decide(&self, event: &AuthorizerEvent) -> AuthzResult<PolicyDocument> {
        let policy = match &self.decision {
            Some(decision) => decision(event)?,
            None => PolicyDocument::from_event(event)?,
        };
        debug!(
            principal_id = policy.principal_id(),
            effect = ?policy.effect(),
            custom = self.decision.is_some(),
            "authorizer decision"
        );
        Ok(policy)
    }

    /// Produces the wire response for `event`.
    pub fn authorize(&self, event: &AuthorizerEvent) -> AuthzResult<AuthorizerResponse> {
        self.decide(event).map(|policy| policy.to_response())
    }

    /// Reads a raw JSON event and produces the raw JSON response.
    pub fn authorize_value(&self, event: Value) -> AuthzResult<Value> {
        let event: AuthorizerEvent = serde_json::from_value(event)?;
        let response = self.authorize(&event)?;
        Ok(serde_json::to_value(response)?)
    }
}

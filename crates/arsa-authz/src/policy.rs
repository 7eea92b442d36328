//! Policy documents and their wire format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AuthzError, AuthzResult};

/// Policy language version emitted in every document.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Action granted or denied by the statement.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Input of a custom authorizer invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerEvent {
    /// Identity token supplied by the caller.
    pub authorization_token: String,
    /// Fully qualified ARN of the invoked method.
    pub method_arn: String,
    /// Authorizer type, usually `TOKEN`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl AuthorizerEvent {
    /// Creates an event from a token and method ARN.
    #[must_use]
    pub fn new(authorization_token: impl Into<String>, method_arn: impl Into<String>) -> Self {
        Self {
            authorization_token: authorization_token.into(),
            method_arn: method_arn.into(),
            kind: Some("TOKEN".to_string()),
        }
    }
}

/// Decision effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Grant access.
    Allow,
    /// Refuse access.
    Deny,
}

/// Generalizes a method ARN so that the policy covers every method and
/// sub-path of the API stage.
///
/// Everything after the second-to-last `/` is replaced with `/*/*`.
///
/// # Example
///
/// ```
/// use arsa_authz::generalize_resource;
///
/// let arn = "arn:aws:execute-api:us-east-1:123456789012:ymy8tbxw7b/v1/GET/{proxy+}";
/// assert_eq!(
///     generalize_resource(arn).unwrap(),
///     "arn:aws:execute-api:us-east-1:123456789012:ymy8tbxw7b/v1/*/*"
/// );
/// ```
pub fn generalize_resource(method_arn: &str) -> AuthzResult<String> {
    let malformed = || AuthzError::MalformedArn(method_arn.to_string());
    let last = method_arn.rfind('/').ok_or_else(malformed)?;
    let second = method_arn[..last].rfind('/').ok_or_else(malformed)?;
    Ok(format!("{}/*/*", &method_arn[..second]))
}

/// An authorization decision.
///
/// # Example
///
/// ```
/// use arsa_authz::{AuthorizerEvent, Effect, PolicyDocument};
///
/// let event = AuthorizerEvent::new("token-123", "arn:aws:execute-api:r:1:api/v1/GET/users");
/// let policy = PolicyDocument::from_event(&event).unwrap();
///
/// assert_eq!(policy.principal_id(), "token-123");
/// assert_eq!(policy.effect(), Effect::Allow);
/// assert!(policy.resource().ends_with("/*/*"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDocument {
    principal_id: String,
    effect: Effect,
    resource: String,
    context: Option<Map<String, Value>>,
}

impl PolicyDocument {
    /// Creates a document from its parts.
    #[must_use]
    pub fn new(principal_id: impl Into<String>, effect: Effect, resource: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            effect,
            resource: resource.into(),
            context: None,
        }
    }

    /// The default decision: allow the token holder on the generalized resource.
    pub fn from_event(event: &AuthorizerEvent) -> AuthzResult<Self> {
        Ok(Self::new(
            event.authorization_token.clone(),
            Effect::Allow,
            generalize_resource(&event.method_arn)?,
        ))
    }

    /// Sets the effect to allow.
    #[must_use]
    pub fn allow(mut self) -> Self {
        self.effect = Effect::Allow;
        self
    }

    /// Sets the effect to deny.
    #[must_use]
    pub fn deny(mut self) -> Self {
        self.effect = Effect::Deny;
        self
    }

    /// Overrides the principal.
    #[must_use]
    pub fn with_principal(mut self, principal_id: impl Into<String>) -> Self {
        self.principal_id = principal_id.into();
        self
    }

    /// Overrides the resource, verbatim.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    /// Attaches context passed through to the integration.
    #[must_use]
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = Some(context);
        self
    }

    /// Principal identifier.
    #[must_use]
    pub fn principal_id(&self) -> &str {
        &self.principal_id
    }

    /// Effect.
    #[must_use]
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Resource the statement applies to.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Context map.
    #[must_use]
    pub fn context(&self) -> Option<&Map<String, Value>> {
        self.context.as_ref()
    }

    /// Renders the wire response.
    #[must_use]
    pub fn to_response(&self) -> AuthorizerResponse {
        AuthorizerResponse {
            principal_id: self.principal_id.clone(),
            policy_document: PolicyBody {
                version: POLICY_VERSION.to_string(),
                statement: vec![Statement {
                    action: INVOKE_ACTION.to_string(),
                    effect: self.effect,
                    resource: self.resource.clone(),
                }],
            },
            context: self.context.clone(),
        }
    }
}

/// Wire output of a custom authorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    /// Principal identifier.
    pub principal_id: String,
    /// The policy.
    pub policy_document: PolicyBody,
    /// Context, or `null`.
    pub context: Option<Map<String, Value>>,
}

/// Policy body of an [`AuthorizerResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyBody {
    /// Policy language version.
    pub version: String,
    /// Statements; always exactly one.
    pub statement: Vec<Statement>,
}

/// A single policy statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    /// Granted or denied action.
    pub action: String,
    /// Effect.
    pub effect: Effect,
    /// Resource ARN pattern.
    pub resource: String,
}

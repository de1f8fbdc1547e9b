//! Decision building
//!
//! Collapses the pipeline outcome into the authorization grant returned to
//! the invoking transport. Success yields an Allow grant scoped to the
//! requested resource, byte-for-byte; every failure yields the same fixed
//! deny-all grant, so nothing about the failure (or the requested
//! resource) leaks back to the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{claims::Claims, result::AuthzResult};

/// Policy language version of the emitted documents.
pub const POLICY_VERSION: &str = "2012-10-17";

/// The single action this gatekeeper grants or denies.
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Deny grants always cover the whole protected surface, never the
/// resource that was actually requested.
pub const DENY_ALL_RESOURCE: &str = "arn:aws:execute-api:*:*:*/ANY/*";

/// Sentinel principal carried by deny grants.
pub const DENIED_PRINCIPAL: &str = "unauthorized";

/// The authorization decision. Immutable and single-use: built, serialized
/// to the caller, and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    Allow {
        principal_id: String,
        resource: String,
    },
    Deny {
        resource: String,
    },
}

impl Grant {
    #[must_use]
    pub fn allow(principal_id: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::Allow {
            principal_id: principal_id.into(),
            resource: resource.into(),
        }
    }

    #[must_use]
    pub fn deny() -> Self {
        Self::Deny {
            resource: DENY_ALL_RESOURCE.to_owned(),
        }
    }

    /// Collapse a pipeline outcome into a grant for `resource`.
    ///
    /// The error kind is logged for operators and then discarded; the
    /// caller only ever sees Allow or the fixed Deny.
    #[must_use]
    pub fn from_outcome(outcome: AuthzResult<Claims>, resource: &str) -> Self {
        match outcome {
            Ok(claims) => {
                debug!("access granted to '{}' on {resource}", claims.sub);
                Self::allow(claims.sub, resource)
            }
            Err(e) => {
                debug!("access denied: {e}");
                Self::deny()
            }
        }
    }
}

/// Wire format of a grant: the authorizer response consumed by the API
/// gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl From<Grant> for AuthorizerResponse {
    fn from(grant: Grant) -> Self {
        let (principal_id, effect, resource) = match grant {
            Grant::Allow {
                principal_id,
                resource,
            } => (principal_id, Effect::Allow, resource),
            Grant::Deny { resource } => (DENIED_PRINCIPAL.to_owned(), Effect::Deny, resource),
        };
        Self {
            principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_owned(),
                statement: vec![PolicyStatement {
                    action: INVOKE_ACTION.to_owned(),
                    effect,
                    resource,
                }],
            },
        }
    }
}

//! Claim validation
//!
//! The payload is decoded into a typed structure only after the signature
//! has been verified; decoding earlier would be the classic
//! trust-before-verify bug. A missing or wrong-typed required claim is a
//! malformed token, not an undefined lookup.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::{authz_ensure, error::AuthzError, result::AuthzResult};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claims {
    /// The authenticated principal
    pub sub: String,
    /// Expiry instant, epoch seconds
    pub exp: Option<i64>,
    /// The client the token was issued for
    pub aud: Option<String>,
    /// Group memberships; Cognito delivers these as `cognito:groups`
    #[serde(default, alias = "cognito:groups")]
    pub groups: Vec<String>,
    // Carried for logging only, never validated
    pub iss: Option<String>,
    pub iat: Option<i64>,
    pub jti: Option<String>,
}

impl Claims {
    /// Decode the payload segment of a signature-verified token.
    pub(crate) fn decode(payload: &str) -> AuthzResult<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|e| {
            AuthzError::MalformedToken(format!("payload is not valid base64url: {e}"))
        })?;
        let claims: Self = serde_json::from_slice(&bytes)
            .map_err(|e| AuthzError::MalformedToken(format!("claims are malformed: {e}")))?;
        authz_ensure!(
            !claims.sub.is_empty(),
            AuthzError::MalformedToken("'sub' claim is empty".to_owned())
        );
        Ok(claims)
    }

    /// Temporal and audience checks, in that order, each failing the whole
    /// validation on its own.
    pub fn validate(&self, expected_audience: &str, now: i64) -> AuthzResult<()> {
        match self.exp {
            None => {
                return Err(AuthzError::TokenExpired(
                    "no 'exp' claim in token".to_owned(),
                ));
            }
            Some(exp) => authz_ensure!(
                exp > now,
                AuthzError::TokenExpired(format!("token expired at {exp} (now {now})"))
            ),
        }

        match &self.aud {
            Some(aud) if aud == expected_audience => Ok(()),
            Some(aud) => Err(AuthzError::AudienceMismatch(format!(
                "token issued for audience '{aud}'"
            ))),
            None => Err(AuthzError::AudienceMismatch(
                "no 'aud' claim in token".to_owned(),
            )),
        }
    }

    /// The authorization predicate input: group membership, absent claim
    /// treated as the empty set.
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

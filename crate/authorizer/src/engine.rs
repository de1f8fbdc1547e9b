//! The decision pipeline
//!
//! [`Authorizer`] wires the stages together: parse, resolve the signing
//! key, verify the signature, validate the claims, evaluate the
//! authorization predicate. [`Authorizer::evaluate`] surfaces the error
//! kind for callers that need it (logging, refresh-on-unknown-key);
//! [`Authorizer::authorize`] collapses everything into a [`Grant`].

use tracing::trace;

use crate::{
    authz_ensure,
    claims::Claims,
    error::AuthzError,
    keyset::KeyStore,
    policy::Grant,
    result::AuthzResult,
    token::ParsedToken,
    verifier::verify_signature,
};

/// Default group a caller must belong to.
pub const DEFAULT_REQUIRED_GROUP: &str = "admin";

/// The immutable per-process validation settings.
///
/// The key set is deliberately not part of this struct: it is injected per
/// call so rotation stays the provider's concern and tests can pass fixed
/// fixtures.
#[derive(Debug, Clone)]
pub struct Authorizer {
    expected_audience: String,
    required_group: String,
}

impl Authorizer {
    #[must_use]
    pub fn new(expected_audience: impl Into<String>) -> Self {
        Self {
            expected_audience: expected_audience.into(),
            required_group: DEFAULT_REQUIRED_GROUP.to_owned(),
        }
    }

    /// Generalize the predicate to another group than
    /// [`DEFAULT_REQUIRED_GROUP`].
    #[must_use]
    pub fn with_required_group(mut self, group: impl Into<String>) -> Self {
        self.required_group = group.into();
        self
    }

    /// Run the validation pipeline and surface the error kind.
    ///
    /// Claims are returned only when every stage passed; they are never
    /// decoded before the signature has been verified.
    pub fn evaluate(
        &self,
        keys: &dyn KeyStore,
        token: &str,
        now: i64,
    ) -> AuthzResult<Claims> {
        let parsed = ParsedToken::parse(token)?;
        trace!("token parsed, kid '{}'", parsed.key_id);

        let record = keys.resolve_key(&parsed.key_id).ok_or_else(|| {
            AuthzError::UnknownSigningKey(format!("no key '{}' in key set", parsed.key_id))
        })?;

        verify_signature(&parsed, &record)?;

        let claims = Claims::decode(parsed.payload)?;
        claims.validate(&self.expected_audience, now)?;

        authz_ensure!(
            claims.in_group(&self.required_group),
            AuthzError::Forbidden(format!(
                "'{}' is not in the '{}' group",
                claims.sub, self.required_group
            ))
        );

        Ok(claims)
    }

    /// Decide access to `resource`: the full pipeline collapsed into a
    /// grant, fail-closed.
    #[must_use]
    pub fn authorize(
        &self,
        keys: &dyn KeyStore,
        token: &str,
        resource: &str,
        now: i64,
    ) -> Grant {
        Grant::from_outcome(self.evaluate(keys, token, now), resource)
    }
}

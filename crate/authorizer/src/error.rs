use thiserror::Error;

// Every kind collapses to the same Deny grant at the boundary; the
// variants exist so operators can tell misconfiguration, attack traffic
// and unauthorized-but-valid users apart in the logs.
#[derive(Error, Debug, Clone)]
pub enum AuthzError {
    // The token is structurally broken: empty, wrong segment count,
    // undecodable header or payload, missing/ill-typed required claim
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    // The token names a `kid` absent from the key set
    #[error("Unknown signing key: {0}")]
    UnknownSigningKey(String),

    // Signature verification failed, including algorithm mismatches
    // between the token header and the resolved key
    #[error("Invalid signature: {0}")]
    SignatureInvalid(String),

    #[error("Token expired: {0}")]
    TokenExpired(String),

    #[error("Audience mismatch: {0}")]
    AudienceMismatch(String),

    // The token is valid but its claims do not pass the authorization
    // predicate
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// Return early with an error if a condition is not satisfied.
///
/// This macro is equivalent to `if !$cond { return Err($err); }`.
#[macro_export]
macro_rules! authz_ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($err);
        }
    };
}

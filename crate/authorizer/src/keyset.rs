//! Public key set
//!
//! [`KeyRecord`] is one verification key, bound to the algorithm its JWK
//! declares. [`KeySet`] is an immutable snapshot of records unique by key
//! id. [`KeyStore`] is the resolution interface the decision pipeline
//! consumes; the server's JWKS manager implements it over its cached sets.

use std::{collections::HashMap, fmt};

use jsonwebtoken::{
    Algorithm, DecodingKey,
    jwk::{Jwk, JwkSet, KeyAlgorithm},
};
use tracing::warn;

use crate::{error::AuthzError, result::AuthzResult};

/// Resolution of a key identifier to verification key material.
///
/// Lookup is by exact `kid` string match. There is no fallback of any
/// kind: an unresolved `kid` must surface as `UnknownSigningKey`, never as
/// a default key.
pub trait KeyStore {
    fn resolve_key(&self, key_id: &str) -> Option<KeyRecord>;
}

/// A single public verification key and the algorithm it is bound to.
#[derive(Clone)]
pub struct KeyRecord {
    pub key_id: String,
    pub algorithm: Algorithm,
    pub decoding_key: DecodingKey,
}

impl fmt::Debug for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRecord")
            .field("key_id", &self.key_id)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl KeyRecord {
    /// Build a record from a JWK.
    ///
    /// The JWK must carry a `kid` and declare a signing algorithm; keys
    /// advertising encryption algorithms (or none at all) are unusable for
    /// token verification and are rejected here so providers can filter
    /// them out of the set.
    pub fn from_jwk(jwk: &Jwk) -> AuthzResult<Self> {
        let key_id = jwk
            .common
            .key_id
            .clone()
            .ok_or_else(|| AuthzError::UnknownSigningKey("JWK carries no 'kid'".to_owned()))?;

        let declared = jwk.common.key_algorithm.ok_or_else(|| {
            AuthzError::UnknownSigningKey(format!("JWK '{key_id}' declares no algorithm"))
        })?;
        let algorithm = signing_algorithm(declared).ok_or_else(|| {
            AuthzError::UnknownSigningKey(format!(
                "JWK '{key_id}' declares non-signing algorithm {declared:?}"
            ))
        })?;

        let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| {
            AuthzError::UnknownSigningKey(format!("JWK '{key_id}' has unusable key material: {e}"))
        })?;

        Ok(Self {
            key_id,
            algorithm,
            decoding_key,
        })
    }
}

/// Map a declared JWK algorithm onto a verification algorithm, rejecting
/// the encryption-only ones.
fn signing_algorithm(declared: KeyAlgorithm) -> Option<Algorithm> {
    match declared {
        KeyAlgorithm::HS256 => Some(Algorithm::HS256),
        KeyAlgorithm::HS384 => Some(Algorithm::HS384),
        KeyAlgorithm::HS512 => Some(Algorithm::HS512),
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        // RSA1_5, RSA-OAEP and friends are encryption algorithms
        _ => None,
    }
}

/// An immutable snapshot of verification keys, unique by `kid`.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    records: HashMap<String, KeyRecord>,
}

impl KeySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a JWKS document, skipping (with a warning) every
    /// entry that cannot become a usable verification key.
    #[must_use]
    pub fn from_jwk_set(jwks: &JwkSet) -> Self {
        let mut set = Self::new();
        for jwk in &jwks.keys {
            match KeyRecord::from_jwk(jwk) {
                Ok(record) => set.insert(record),
                Err(e) => warn!("ignoring JWKS entry: {e}"),
            }
        }
        set
    }

    /// Insert a record; a record with the same `kid` is replaced.
    pub fn insert(&mut self, record: KeyRecord) {
        self.records.insert(record.key_id.clone(), record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KeyStore for KeySet {
    fn resolve_key(&self, key_id: &str) -> Option<KeyRecord> {
        self.records.get(key_id).cloned()
    }
}

//! Signature verification
//!
//! Confirms that the signature segment is a valid signature over the exact
//! `header.payload` bytes under the algorithm bound to the resolved key.
//! The algorithm the token claims must match the one the key declares; a
//! mismatch fails verification and is never retried under another
//! algorithm.

use tracing::trace;

use crate::{authz_ensure, error::AuthzError, keyset::KeyRecord, result::AuthzResult, token::ParsedToken};

pub(crate) fn verify_signature(parsed: &ParsedToken<'_>, record: &KeyRecord) -> AuthzResult<()> {
    authz_ensure!(
        parsed.algorithm == record.algorithm,
        AuthzError::SignatureInvalid(format!(
            "token claims algorithm {:?} but key '{}' is bound to {:?}",
            parsed.algorithm, record.key_id, record.algorithm
        ))
    );

    trace!(
        "verifying signature with key '{}' ({:?})",
        record.key_id, record.algorithm
    );

    match jsonwebtoken::crypto::verify(
        parsed.signature,
        parsed.message.as_bytes(),
        &record.decoding_key,
        record.algorithm,
    ) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthzError::SignatureInvalid(
            "signature verification failed".to_owned(),
        )),
        Err(e) => Err(AuthzError::SignatureInvalid(format!(
            "cannot verify signature: {e}"
        ))),
    }
}

//! Token parsing
//!
//! Splits a compact signed token into its three segments and decodes the
//! header, without decoding or trusting the payload. The header is only
//! used to select a verification key; nothing in it is believed until the
//! signature has been checked.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::Algorithm;
use serde::Deserialize;

use crate::{authz_ensure, error::AuthzError, result::AuthzResult};

/// The `alg` field deserializes into [`Algorithm`], so a token claiming
/// `none` or an algorithm the crate does not implement fails parsing
/// outright instead of reaching the verifier.
#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: Algorithm,
    kid: Option<String>,
}

/// An untrusted token split into its structural parts.
///
/// `message` is the exact `header.payload` substring as presented, not a
/// re-encoding: the signature covers those bytes and nothing else.
#[derive(Debug)]
pub(crate) struct ParsedToken<'a> {
    pub key_id: String,
    pub algorithm: Algorithm,
    pub message: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> ParsedToken<'a> {
    /// Parse the raw authorization string as presented by the transport.
    ///
    /// An optional `Bearer ` prefix is stripped first; the remainder must
    /// be exactly `header.payload.signature`.
    pub(crate) fn parse(raw: &'a str) -> AuthzResult<Self> {
        let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
        authz_ensure!(
            !token.is_empty(),
            AuthzError::MalformedToken("token is empty".to_owned())
        );

        let segments: Vec<&str> = token.split('.').collect();
        let &[header, payload, signature] = segments.as_slice() else {
            return Err(AuthzError::MalformedToken(format!(
                "expected 3 dot-separated segments, got {}",
                segments.len()
            )));
        };

        let header_bytes = URL_SAFE_NO_PAD.decode(header).map_err(|e| {
            AuthzError::MalformedToken(format!("header is not valid base64url: {e}"))
        })?;
        let header: TokenHeader = serde_json::from_slice(&header_bytes)
            .map_err(|e| AuthzError::MalformedToken(format!("header is not a valid JOSE header: {e}")))?;

        let key_id = header.kid.ok_or_else(|| {
            AuthzError::MalformedToken("no 'kid' present in token header".to_owned())
        })?;

        // The signature covers everything before the last separator
        let message_len = token.len() - signature.len() - 1;
        let message = token.get(..message_len).ok_or_else(|| {
            AuthzError::MalformedToken("token segments are inconsistent".to_owned())
        })?;

        Ok(Self {
            key_id,
            algorithm: header.alg,
            message,
            payload,
            signature,
        })
    }
}

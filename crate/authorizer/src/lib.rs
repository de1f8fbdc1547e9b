//! Warden authorization core
//!
//! This crate decides, once per inbound request, whether an opaque bearer
//! token grants access to a requested resource. The pipeline is:
//! token parsing, signature verification against a resolved public key,
//! claim validation (expiry, audience), a group-membership predicate, and
//! finally the collapse into an Allow or Deny policy grant.
//!
//! The core performs no I/O: the key set is injected through the
//! [`KeyStore`] trait and the current time is passed in, so the whole
//! pipeline is a pure function and safe to invoke concurrently.
//! Every failure, whatever its kind, collapses into the same deny-all
//! grant; the specific error kind is only surfaced through logs.

pub mod claims;
pub mod engine;
pub mod error;
pub mod keyset;
pub mod policy;
pub mod result;
mod token;
mod verifier;

pub use claims::Claims;
pub use engine::{Authorizer, DEFAULT_REQUIRED_GROUP};
pub use error::AuthzError;
pub use keyset::{KeyRecord, KeySet, KeyStore};
pub use policy::{
    AuthorizerResponse, DENIED_PRINCIPAL, DENY_ALL_RESOURCE, Effect, Grant, PolicyDocument,
    PolicyStatement,
};
pub use result::AuthzResult;

#[cfg(test)]
mod tests;

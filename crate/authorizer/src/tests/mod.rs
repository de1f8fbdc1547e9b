//! End-to-end pipeline tests against a generated RSA identity provider.
//!
//! The keypair is generated once per test process; tokens are minted with
//! `jsonwebtoken::encode` and validated through the public [`Authorizer`]
//! surface, exactly as the server drives it.

#![allow(clippy::unwrap_used)]

use std::sync::OnceLock;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header, jwk::JwkSet};
use rsa::{RsaPrivateKey, pkcs1::EncodeRsaPrivateKey, traits::PublicKeyParts};
use serde_json::{Value, json};

use crate::{Authorizer, AuthzError, DENY_ALL_RESOURCE, Grant, KeySet, KeyStore};

const TEST_KID: &str = "test-key-1";
const AUDIENCE: &str = "warden-test-client";
const RESOURCE: &str = "arn:aws:execute-api:eu-west-1:123456789012:abcdef/prod/GET/orders";
// Tests inject the clock, so any fixed instant works
const NOW: i64 = 1_700_000_000;

struct TestIdp {
    encoding: EncodingKey,
    keys: KeySet,
}

static IDP: OnceLock<TestIdp> = OnceLock::new();

fn idp() -> &'static TestIdp {
    IDP.get_or_init(|| {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, 2048).unwrap();

        let pem = private.to_pkcs1_pem(rsa::pkcs1::LineEnding::LF).unwrap();
        let encoding = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();

        // Publish the public half the way an IdP does: as a JWKS document
        let jwks: JwkSet = serde_json::from_value(json!({
            "keys": [{
                "kty": "RSA",
                "alg": "RS256",
                "use": "sig",
                "kid": TEST_KID,
                "n": URL_SAFE_NO_PAD.encode(private.n().to_bytes_be()),
                "e": URL_SAFE_NO_PAD.encode(private.e().to_bytes_be()),
            }]
        }))
        .unwrap();

        TestIdp {
            encoding,
            keys: KeySet::from_jwk_set(&jwks),
        }
    })
}

fn mint_with(algorithm: Algorithm, kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(algorithm);
    header.kid = kid.map(str::to_owned);
    jsonwebtoken::encode(&header, claims, &idp().encoding).unwrap()
}

fn mint(claims: &Value) -> String {
    mint_with(Algorithm::RS256, Some(TEST_KID), claims)
}

fn admin_claims() -> Value {
    json!({
        "sub": "user-1",
        "exp": NOW + 3600,
        "aud": AUDIENCE,
        "groups": ["admin"],
    })
}

fn authorizer() -> Authorizer {
    Authorizer::new(AUDIENCE)
}

#[test]
fn jwks_fixture_is_usable() {
    assert_eq!(idp().keys.len(), 1);
    assert!(idp().keys.resolve_key(TEST_KID).is_some());
}

#[test]
fn malformed_inputs_are_denied() {
    let no_kid = mint_with(Algorithm::RS256, None, &admin_claims());
    for raw in ["", "garbage", "a.b", "a.b.c.d", "!!!.x.y", no_kid.as_str()] {
        let err = authorizer()
            .evaluate(&idp().keys, raw, NOW)
            .unwrap_err();
        assert!(matches!(err, AuthzError::MalformedToken(_)), "{raw:?}: {err}");
    }
}

#[test]
fn unknown_signing_key_is_denied() {
    let token = mint_with(Algorithm::RS256, Some("rotated-away"), &admin_claims());
    let err = authorizer().evaluate(&idp().keys, &token, NOW).unwrap_err();
    assert!(matches!(err, AuthzError::UnknownSigningKey(_)), "{err}");
}

#[test]
fn tampered_payload_is_denied() {
    let token = mint(&admin_claims());
    let parts: Vec<&str> = token.split('.').collect();

    // Escalate the claims after signing, keeping the original signature
    let mut claims = admin_claims();
    claims["sub"] = json!("someone-else");
    let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    let err = authorizer().evaluate(&idp().keys, &forged, NOW).unwrap_err();
    assert!(matches!(err, AuthzError::SignatureInvalid(_)), "{err}");
}

#[test]
fn algorithm_confusion_is_denied() {
    // Validly signed under RS384 with the same RSA key; the key set binds
    // the kid to RS256, so this must fail instead of being retried
    let token = mint_with(Algorithm::RS384, Some(TEST_KID), &admin_claims());
    let err = authorizer().evaluate(&idp().keys, &token, NOW).unwrap_err();
    assert!(matches!(err, AuthzError::SignatureInvalid(_)), "{err}");
}

#[test]
fn expired_token_is_denied_even_with_correct_groups() {
    let token = mint(&json!({
        "sub": "user-1",
        "exp": NOW - 1,
        "aud": AUDIENCE,
        "groups": ["admin"],
    }));
    let err = authorizer().evaluate(&idp().keys, &token, NOW).unwrap_err();
    assert!(matches!(err, AuthzError::TokenExpired(_)), "{err}");
}

#[test]
fn wrong_audience_is_denied() {
    let token = mint(&json!({
        "sub": "user-1",
        "exp": NOW + 3600,
        "aud": "some-other-client",
        "groups": ["admin"],
    }));
    let err = authorizer().evaluate(&idp().keys, &token, NOW).unwrap_err();
    assert!(matches!(err, AuthzError::AudienceMismatch(_)), "{err}");
}

#[test]
fn valid_token_without_required_group_is_forbidden() {
    for groups in [json!(["users", "ops"]), json!([])] {
        let token = mint(&json!({
            "sub": "user-1",
            "exp": NOW + 3600,
            "aud": AUDIENCE,
            "groups": groups,
        }));
        let err = authorizer().evaluate(&idp().keys, &token, NOW).unwrap_err();
        assert!(matches!(err, AuthzError::Forbidden(_)), "{err}");
    }

    // Absent groups claim is the empty set
    let token = mint(&json!({"sub": "user-1", "exp": NOW + 3600, "aud": AUDIENCE}));
    let err = authorizer().evaluate(&idp().keys, &token, NOW).unwrap_err();
    assert!(matches!(err, AuthzError::Forbidden(_)), "{err}");
}

#[test]
fn admin_token_is_allowed_with_exact_resource() {
    let token = mint(&admin_claims());
    let grant = authorizer().authorize(&idp().keys, &token, RESOURCE, NOW);
    assert_eq!(grant, Grant::allow("user-1", RESOURCE));
}

#[test]
fn predicate_generalizes_to_other_groups() {
    let token = mint(&json!({
        "sub": "op-7",
        "exp": NOW + 3600,
        "aud": AUDIENCE,
        "groups": ["operators"],
    }));
    let authorizer = Authorizer::new(AUDIENCE).with_required_group("operators");
    let claims = authorizer.evaluate(&idp().keys, &token, NOW).unwrap();
    assert_eq!(claims.sub, "op-7");
}

#[test]
fn authorization_is_idempotent() {
    let token = mint(&admin_claims());
    let first = authorizer().authorize(&idp().keys, &token, RESOURCE, NOW);
    let second = authorizer().authorize(&idp().keys, &token, RESOURCE, NOW);
    assert_eq!(first, second);
}

#[test]
fn every_denial_carries_the_fixed_wildcard_resource() {
    let expired = mint(&json!({"sub": "u", "exp": NOW - 1, "aud": AUDIENCE}));
    let wrong_aud = mint(&json!({"sub": "u", "exp": NOW + 1, "aud": "other"}));
    let no_group = mint(&json!({"sub": "u", "exp": NOW + 1, "aud": AUDIENCE}));
    let unknown_kid = mint_with(Algorithm::RS256, Some("nope"), &admin_claims());

    for token in ["not-a-token", &expired, &wrong_aud, &no_group, &unknown_kid] {
        let grant = authorizer().authorize(&idp().keys, token, RESOURCE, NOW);
        let Grant::Deny { resource } = grant else {
            panic!("expected a deny for {token:?}");
        };
        assert_eq!(resource, DENY_ALL_RESOURCE);
    }
}

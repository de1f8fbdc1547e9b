//! Endpoint tests
//!
//! Drive the authorize route end-to-end: an offline JWKS manager seeded
//! with a generated RSA key, real tokens minted against it, and the
//! responses checked down to the policy document.

#![allow(clippy::unwrap_used)]

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use actix_web::{App, test, web::Data};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, jwk::JwkSet};
use rsa::{RsaPrivateKey, pkcs1::EncodeRsaPrivateKey, traits::PublicKeyParts};
use serde_json::{Value, json};
use warden_authorizer::{Authorizer, DENY_ALL_RESOURCE, KeySet};

use crate::{
    jwks::JwksManager,
    routes::{self, AppState},
};

const TEST_KID: &str = "endpoint-key-1";
const AUDIENCE: &str = "endpoint-test-client";
const METHOD_ARN: &str = "arn:aws:execute-api:eu-west-1:123456789012:abcdef/prod/GET/orders";

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

fn state() -> Data<AppState> {
    Data::new(AppState {
        authorizer: Authorizer::new(AUDIENCE),
        jwks: Arc::new(JwksManager::from_sets(HashMap::from([(
            "https://idp.example/jwks.json".to_owned(),
            idp().keys.clone(),
        )]))),
    })
}

fn mint(claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_owned());
    jsonwebtoken::encode(&header, claims, &idp().encoding).unwrap()
}

async fn authorize_call(body: Value) -> Value {
    let app = test::init_service(App::new().app_data(state()).service(routes::authorize)).await;
    let req = test::TestRequest::post()
        .uri("/authorize")
        .set_json(body)
        .to_request();
    test::call_and_read_body_json(&app, req).await
}

fn statement(response: &Value) -> &Value {
    &response["policyDocument"]["Statement"][0]
}

#[actix_web::test]
async fn health_endpoint_is_up() {
    let app = test::init_service(App::new().service(routes::health)).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let response = test::call_service(&app, req).await;
    assert!(response.status().is_success());
}

#[actix_web::test]
async fn garbage_token_gets_the_fixed_deny() {
    let response = authorize_call(json!({
        "authorizationToken": "not-a-token",
        "methodArn": METHOD_ARN,
    }))
    .await;

    assert_eq!(response["principalId"], "unauthorized");
    assert_eq!(statement(&response)["Effect"], "Deny");
    // never the requested resource
    assert_eq!(statement(&response)["Resource"], DENY_ALL_RESOURCE);
}

#[actix_web::test]
async fn missing_fields_deny() {
    let response = authorize_call(json!({})).await;
    assert_eq!(statement(&response)["Effect"], "Deny");
    assert_eq!(statement(&response)["Resource"], DENY_ALL_RESOURCE);
}

#[actix_web::test]
async fn admin_token_is_allowed_on_the_requested_resource() {
    let token = mint(&json!({
        "sub": "user-1",
        "exp": Utc::now().timestamp() + 3600,
        "aud": AUDIENCE,
        "groups": ["admin"],
    }));
    let response = authorize_call(json!({
        "authorizationToken": token,
        "methodArn": METHOD_ARN,
    }))
    .await;

    assert_eq!(response["principalId"], "user-1");
    assert_eq!(statement(&response)["Effect"], "Allow");
    assert_eq!(statement(&response)["Action"], "execute-api:Invoke");
    assert_eq!(statement(&response)["Resource"], METHOD_ARN);
}

#[actix_web::test]
async fn expired_token_is_denied() {
    let token = mint(&json!({
        "sub": "user-1",
        "exp": Utc::now().timestamp() - 60,
        "aud": AUDIENCE,
        "groups": ["admin"],
    }));
    let response = authorize_call(json!({
        "authorizationToken": token,
        "methodArn": METHOD_ARN,
    }))
    .await;

    assert_eq!(statement(&response)["Effect"], "Deny");
    assert_eq!(statement(&response)["Resource"], DENY_ALL_RESOURCE);
}

#[actix_web::test]
async fn non_admin_token_is_denied() {
    let token = mint(&json!({
        "sub": "user-2",
        "exp": Utc::now().timestamp() + 3600,
        "aud": AUDIENCE,
        "groups": ["users"],
    }));
    let response = authorize_call(json!({
        "authorizationToken": token,
        "methodArn": METHOD_ARN,
    }))
    .await;

    assert_eq!(response["principalId"], "unauthorized");
    assert_eq!(statement(&response)["Effect"], "Deny");
}

//! HTTP surface
//!
//! The authorizer endpoint never errors across its boundary: whatever
//! happens inside the pipeline, the response is HTTP 200 carrying a
//! structurally valid grant, and every failure is the same deny-all
//! policy. Error kinds are logged here for operators only.

use std::sync::Arc;

use actix_web::{
    HttpResponse, Responder, get, post,
    web::{Data, Json},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, trace};
use warden_authorizer::{Authorizer, AuthorizerResponse, AuthzError, Grant};

use crate::jwks::JwksManager;

pub struct AppState {
    pub authorizer: Authorizer,
    pub jwks: Arc<JwksManager>,
}

/// The invocation payload: the bearer token and the resource it is
/// presented for. Missing fields default to empty strings, which deny.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizerRequest {
    pub authorization_token: String,
    pub method_arn: String,
}

#[post("/authorize")]
pub(crate) async fn authorize(
    state: Data<AppState>,
    request: Json<AuthorizerRequest>,
) -> impl Responder {
    let AuthorizerRequest {
        authorization_token,
        method_arn,
    } = request.into_inner();
    trace!("authorization requested for {method_arn}");

    let now = Utc::now().timestamp();
    let jwks = state.jwks.as_ref();
    let mut outcome = state.authorizer.evaluate(jwks, &authorization_token, now);

    // An unknown kid may just mean the provider rotated its keys since the
    // last fetch: refresh once and retry
    if matches!(outcome, Err(AuthzError::UnknownSigningKey(_))) {
        match jwks.refresh().await {
            Ok(()) => outcome = state.authorizer.evaluate(jwks, &authorization_token, now),
            Err(e) => error!("JWKS refresh failed: {e}"),
        }
    }

    if let Err(e) = &outcome {
        error!("{method_arn} denied: {e}");
    }

    let grant = Grant::from_outcome(outcome, &method_arn);
    HttpResponse::Ok().json(AuthorizerResponse::from(grant))
}

#[get("/health")]
pub(crate) async fn health() -> impl Responder {
    HttpResponse::Ok().finish()
}

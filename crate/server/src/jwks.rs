//! JWKS (JSON Web Key Set) Manager
//!
//! Fetches the key set documents the decision core verifies tokens
//! against, caches them per URI, and refreshes them on demand with a
//! throttle. The cached sets are immutable snapshots: rotation is handled
//! here, never inside the core.

use std::{collections::HashMap, sync::RwLock};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::jwk::{Jwk, JwkSet};
use serde_json::Value;
use tracing::error;
use warden_authorizer::{KeyRecord, KeySet, KeyStore};

use crate::{
    error::WardenError,
    result::{WResult, WResultHelper},
    warden_bail, warden_error,
};

static REFRESH_INTERVAL: i64 = 60; // in secs

#[derive(Debug)]
pub struct JwksManager {
    uris: Vec<String>,
    sets: RwLock<HashMap<String, KeySet>>,
    last_update: RwLock<Option<DateTime<Utc>>>,
}

impl JwksManager {
    /// Fetch every configured URI once (the process cold-start) and build
    /// the manager around the result.
    pub async fn new(uris: Vec<String>) -> WResult<Self> {
        let jwks_manager = Self {
            uris,
            sets: HashMap::new().into(),
            last_update: None.into(),
        };
        jwks_manager.refresh().await?;

        Ok(jwks_manager)
    }

    /// Build a manager from already-fetched key sets; no URI is ever
    /// contacted. For tests and air-gapped deployments.
    #[must_use]
    pub fn from_sets(sets: HashMap<String, KeySet>) -> Self {
        Self {
            uris: Vec::new(),
            sets: RwLock::new(sets),
            last_update: RwLock::new(Some(Utc::now())),
        }
    }

    /// Lock `sets` to replace it
    fn set_sets(&self, new_sets: HashMap<String, KeySet>) -> WResult<()> {
        let mut sets = self.sets.write().map_err(|e| {
            WardenError::ServerError(format!("cannot lock JWKS for write. Error: {e:?}"))
        })?;
        *sets = new_sets;
        Ok(())
    }

    /// Fetch again all JWKS using the `uris`.
    ///
    /// The threshold to refresh JWKS is set to `REFRESH_INTERVAL`.
    pub async fn refresh(&self) -> WResult<()> {
        let refresh_is_allowed = {
            let mut last_update = self.last_update.write().map_err(|e| {
                WardenError::ServerError(format!(
                    "cannot lock last_update for write. Error: {e:?}"
                ))
            })?;

            let can_be_refreshed = last_update
                .is_none_or(|lu| (lu + Duration::seconds(REFRESH_INTERVAL)) < Utc::now());

            if can_be_refreshed {
                *last_update = Some(Utc::now());
            }
            can_be_refreshed
        };

        if refresh_is_allowed {
            tracing::info!("Refreshing JWKS");
            let refreshed_sets = Self::fetch_all(&self.uris).await;
            self.set_sets(refreshed_sets)?;
        }

        Ok(())
    }

    /// Refresh the key sets by making an external HTTP call to all the
    /// `uris`.
    ///
    /// The JWK Sets are fetched in parallel and warn about failures
    /// without stopping the whole fetch process.
    async fn fetch_all(uris: &[String]) -> HashMap<String, KeySet> {
        let jwks_downloads: Vec<_> = uris.iter().map(fetch_jwks).collect();
        futures::future::join_all(jwks_downloads)
            .await
            .into_iter()
            .filter(|res| {
                // log errors and filter them out
                res.as_ref()
                    .map_err(|e| {
                        tracing::warn!("Fetch JWKS: {e}");
                    })
                    .is_ok()
            })
            .flatten()
            .collect::<HashMap<_, _>>()
    }
}

impl KeyStore for JwksManager {
    /// Find the key identifier `kid` in each cached key set.
    fn resolve_key(&self, key_id: &str) -> Option<KeyRecord> {
        match self.sets.read() {
            Ok(sets) => sets.values().find_map(|set| set.resolve_key(key_id)),
            Err(e) => {
                // a poisoned lock resolves nothing: fail closed
                error!("cannot lock JWKS for read. Error: {e:?}");
                None
            }
        }
    }
}

/// Fetch a JWKS from the provided URI and parse it.
async fn fetch_jwks(jwks_uri: &String) -> WResult<(String, KeySet)> {
    tracing::debug!("fetching {jwks_uri}");
    let json_value = reqwest::get(jwks_uri)
        .await
        .context("Unable to connect to retrieve JWKS")?
        .json::<Value>()
        .await
        .map_err(|e| warden_error!("Failed to parse JWKS response from {jwks_uri}: {e}"))?;

    let set = parse_jwks_document(jwks_uri, &json_value)?;
    Ok((jwks_uri.clone(), set))
}

/// Parse one JWKS document into a key set.
///
/// This function will log entries that are not valid or usable JWKs
/// but it will not stop the process if one fails.
fn parse_jwks_document(jwks_uri: &str, json_value: &Value) -> WResult<KeySet> {
    let Some(keys) = json_value.get("keys") else {
        warden_bail!("JSON key 'keys' not found in JWKS at {jwks_uri}");
    };
    let entries = match keys {
        Value::Array(array) => array
            .iter()
            .filter_map(|v| match serde_json::from_value::<Jwk>(v.clone()) {
                Ok(jwk) => Some(jwk),
                Err(e) => {
                    tracing::debug!("Ignoring invalid JWK in JWKS at `{jwks_uri}`: {e}: {v:#?}");
                    None
                }
            })
            .collect::<Vec<Jwk>>(),
        _ => vec![],
    };

    let set = KeySet::from_jwk_set(&JwkSet { keys: entries });
    if set.is_empty() {
        warden_bail!("No usable verification key found in JWKS at `{jwks_uri}`");
    }
    Ok(set)
}

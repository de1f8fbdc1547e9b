use clap::Args;

use crate::{error::WardenError, result::WResult};

#[derive(Debug, Args)]
pub struct AuthConfig {
    /// The issuer URI of the JWT token
    ///
    /// For Auth0, this is the delegated authority domain configured on Auth0, for instance
    /// `https://<your-tenant>.<region>.auth0.com/`
    ///
    /// For Google, this would be `https://accounts.google.com`
    #[clap(long, env = "WARDEN_JWT_ISSUER_URI")]
    pub jwt_issuer_uri: Option<String>,

    /// The JWKS (Json Web Key Set) URI of the JWT token
    ///
    /// For Auth0, this would be `https://<your-tenant>.<region>.auth0.com/.well-known/jwks.json`
    ///
    /// For Google, this would be `https://www.googleapis.com/oauth2/v3/certs`
    ///
    /// Defaults to `<jwt-issuer-uri>/.well-known/jwks.json` if not set
    #[clap(long, env = "WARDEN_JWKS_URI")]
    pub jwks_uri: Option<String>,

    /// The AWS region of a Cognito user pool
    ///
    /// Together with `--cognito-user-pool-id`, this derives the issuer
    /// `https://cognito-idp.<region>.amazonaws.com/<pool-id>` when no
    /// explicit issuer URI is given
    #[clap(long, env = "WARDEN_COGNITO_REGION")]
    pub cognito_region: Option<String>,

    /// The Cognito user pool identifier, for instance `eu-west-1_aB12cD34e`
    #[clap(long, env = "WARDEN_COGNITO_USER_POOL_ID")]
    pub cognito_user_pool_id: Option<String>,

    /// The audience the tokens must be issued for (the app client id);
    /// compared with strict string equality against the `aud` claim
    #[clap(long, env = "WARDEN_JWT_AUDIENCE")]
    pub jwt_audience: String,

    /// The group a caller must belong to for access to be granted
    #[clap(
        long,
        env = "WARDEN_REQUIRED_GROUP",
        default_value = warden_authorizer::DEFAULT_REQUIRED_GROUP
    )]
    pub required_group: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_issuer_uri: None,
            jwks_uri: None,
            cognito_region: None,
            cognito_user_pool_id: None,
            jwt_audience: String::new(),
            required_group: warden_authorizer::DEFAULT_REQUIRED_GROUP.to_owned(),
        }
    }
}

impl AuthConfig {
    /// Build a JWKS URI using `jwt_issuer_uri` and an optional `jwks_uri`.
    pub(crate) fn uri(jwt_issuer_uri: &str, jwks_uri: Option<&str>) -> String {
        jwks_uri.map_or_else(
            || {
                format!(
                    "{}/.well-known/jwks.json",
                    jwt_issuer_uri.trim_end_matches('/')
                )
            },
            std::string::ToString::to_string,
        )
    }

    /// The configured or derived issuer URI.
    fn issuer_uri(&self) -> Option<String> {
        if self.jwt_issuer_uri.is_some() {
            return self.jwt_issuer_uri.clone();
        }
        match (&self.cognito_region, &self.cognito_user_pool_id) {
            (Some(region), Some(pool_id)) => Some(format!(
                "https://cognito-idp.{region}.amazonaws.com/{pool_id}"
            )),
            _ => None,
        }
    }

    /// Resolve the JWKS URI this server will fetch its verification keys
    /// from: explicit, or derived from the (possibly Cognito-derived)
    /// issuer.
    pub(crate) fn resolve_jwks_uri(&self) -> WResult<String> {
        if let Some(jwks_uri) = &self.jwks_uri {
            return Ok(jwks_uri.clone());
        }
        self.issuer_uri()
            .map(|issuer| Self::uri(&issuer, None))
            .ok_or_else(|| {
                WardenError::InvalidConfiguration(
                    "no JWKS source: set --jwks-uri, --jwt-issuer-uri, or --cognito-region with \
                     --cognito-user-pool-id"
                        .to_owned(),
                )
            })
    }
}

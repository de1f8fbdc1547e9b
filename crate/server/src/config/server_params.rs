use url::Url;

use super::ClapConfig;
use crate::{error::WardenError, result::WResult};

/// The runtime parameters of the server, resolved from the command line
/// configuration at startup and immutable thereafter.
#[derive(Debug, Clone)]
pub struct ServerParams {
    pub hostname: String,
    pub port: u16,
    /// JWKS documents to fetch verification keys from
    pub jwks_uris: Vec<String>,
    pub jwt_audience: String,
    pub required_group: String,
}

impl TryFrom<ClapConfig> for ServerParams {
    type Error = WardenError;

    fn try_from(config: ClapConfig) -> WResult<Self> {
        let jwks_uri = config.auth.resolve_jwks_uri()?;
        Url::parse(&jwks_uri)?;

        Ok(Self {
            hostname: config.http.hostname,
            port: config.http.port,
            jwks_uris: vec![jwks_uri],
            jwt_audience: config.auth.jwt_audience,
            required_group: config.auth.required_group,
        })
    }
}

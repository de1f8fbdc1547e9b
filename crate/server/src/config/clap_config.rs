use clap::Parser;

use super::{AuthConfig, HttpConfig};
use crate::telemetry::LoggingConfig;

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
pub struct ClapConfig {
    #[clap(flatten)]
    pub http: HttpConfig,

    #[clap(flatten)]
    pub auth: AuthConfig,

    #[clap(flatten)]
    pub logging: LoggingConfig,
}

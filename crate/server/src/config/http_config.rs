use std::fmt::Display;

use clap::Args;

#[derive(Args, Clone)]
pub struct HttpConfig {
    /// The authorizer server port
    #[clap(long, env = "WARDEN_PORT", default_value = "9090")]
    pub port: u16,

    /// The authorizer server hostname
    #[clap(long, env = "WARDEN_HOSTNAME", default_value = "0.0.0.0")]
    pub hostname: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 9090,
            hostname: "0.0.0.0".to_owned(),
        }
    }
}

impl Display for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "http://{}:{}", self.hostname, self.port)
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", &self))
    }
}

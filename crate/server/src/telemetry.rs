//! Logging initialization
//!
//! `tracing` with an environment filter and a compact fmt layer. Filtering
//! is driven by `RUST_LOG`; `main` installs a sensible default when the
//! variable is absent.

use clap::Args;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Args, Clone)]
pub struct LoggingConfig {
    /// Do not log to stdout
    #[clap(long, env = "WARDEN_LOG_QUIET", default_value = "false")]
    pub quiet: bool,
}

/// Initialize the logging system
pub fn initialize_logging(config: &LoggingConfig) {
    if config.quiet {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .compact()
        .init();
}

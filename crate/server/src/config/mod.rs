//! Startup configuration
//!
//! Command-line arguments with `WARDEN_*` environment fallbacks, read once
//! at startup and converted into the immutable [`ServerParams`] the rest
//! of the process runs on.

mod auth_config;
pub use auth_config::AuthConfig;

mod clap_config;
pub use clap_config::ClapConfig;

mod http_config;
pub use http_config::HttpConfig;

mod server_params;
pub use server_params::ServerParams;

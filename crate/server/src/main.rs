use clap::Parser;
use dotenvy::dotenv;
use tracing::{debug, info};
use warden_server::{
    config::{ClapConfig, ServerParams},
    result::WResult,
    start_server::start_authorizer_server,
    telemetry::initialize_logging,
};

/// The main entrypoint of the program.
///
/// Sets up the environment variables and logging options, parses the
/// command line arguments and starts the authorizer server.
#[tokio::main]
async fn main() -> WResult<()> {
    // Set up environment variables and logging options
    if std::env::var("RUST_BACKTRACE").is_err() {
        unsafe {
            std::env::set_var("RUST_BACKTRACE", "full");
        }
    }
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var(
                "RUST_LOG",
                "info,warden_server=info,warden_authorizer=info,actix_web=info",
            );
        }
    }

    // Load variables from a .env file
    dotenv().ok();

    let clap_config = ClapConfig::parse();

    initialize_logging(&clap_config.logging);
    debug!("Command line config: {clap_config:#?}");

    // Resolve the immutable runtime parameters from the command line
    let server_params = ServerParams::try_from(clap_config)?;
    info!("Server parameters: {server_params:?}");

    Box::pin(start_authorizer_server(server_params)).await
}

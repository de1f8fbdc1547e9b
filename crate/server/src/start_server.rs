use std::sync::Arc;

use actix_web::{App, HttpServer, web::Data};
use tracing::info;
use warden_authorizer::Authorizer;

use crate::{
    config::ServerParams,
    jwks::JwksManager,
    result::WResult,
    routes::{self, AppState},
};

/// Start the authorizer server.
///
/// Fetches the initial key sets (the cold-start load), then serves until
/// stopped. Key rotation after startup is handled by the refresh-and-retry
/// in the authorize route.
pub async fn start_authorizer_server(server_params: ServerParams) -> WResult<()> {
    info!("Loading JWKS from {:?}", server_params.jwks_uris);
    let jwks = Arc::new(JwksManager::new(server_params.jwks_uris.clone()).await?);

    let authorizer = Authorizer::new(server_params.jwt_audience.clone())
        .with_required_group(server_params.required_group.clone());
    let state = Data::new(AppState { authorizer, jwks });

    info!(
        "Starting the authorizer server on http://{}:{}",
        server_params.hostname, server_params.port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(routes::authorize)
            .service(routes::health)
    })
    .bind((server_params.hostname.clone(), server_params.port))?
    .run()
    .await
    .map_err(Into::into)
}

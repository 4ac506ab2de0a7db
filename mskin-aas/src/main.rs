use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use mskin_aas_lib::{
    config::MskinConfiguration,
    routes::{router, MskinState},
    utils::tracing::setup_tracing,
};
use mskin_rendering::RenderEngine;
use tokio::net::TcpListener;
use tracing::{info, warn};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // An explicit path must exist, the default one is optional
    let config_path = std::env::args().nth(1).map(PathBuf::from).or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        default.exists().then_some(default)
    });

    let config = MskinConfiguration::load(config_path.as_deref())
        .context("Unable to load configuration")?;

    setup_tracing(&config.tracing)?;
    info!(?config, "Loaded configuration");

    let models_directory = &config.rendering.models_directory;
    let engine = RenderEngine::new(models_directory)
        .with_context(|| format!("Unable to load models from {}", models_directory.display()))?;

    let state = MskinState::new(engine, &config.rendering);

    let listener = TcpListener::bind((config.server.address.as_str(), config.server.port)).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "Unable to listen for the shutdown signal");
    }

    info!("Shutting down");
}

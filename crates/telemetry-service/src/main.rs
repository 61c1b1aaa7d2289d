//! Telemetry Service - plain-text ingestion and daily power HTTP API.
//!
//! Run with: `cargo run -p telemetry-service`

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use telemetry_service::{AppState, Config, api};
use telemetry_store::Store;

/// Telemetry Service - ingest readings and query daily power over HTTP.
#[derive(Parser, Debug)]
#[command(name = "telemetry-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,

    /// Listening port (overrides the port of the bind address).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file in the working directory may supply PORT and RUST_LOG.
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("telemetry_service=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    // Override config with CLI args
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.set_port(port);
    }
    config.validate()?;

    let addr: SocketAddr = tokio::net::lookup_host(&config.server.bind)
        .await?
        .next()
        .ok_or_else(|| anyhow::anyhow!("bind address {} did not resolve", config.server.bind))?;

    let state = AppState::new(Store::new(), config);
    let app = api::app(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fulfillment_engine::api::{AppState, create_router};
use fulfillment_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serves the delivery reconciliation API.
#[derive(Debug, Parser)]
#[command(name = "fulfillment-engine", version, about)]
struct Args {
    /// Directory holding pipeline.yaml and columns.yaml.
    #[arg(long, default_value = "./config/default")]
    config: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = ConfigLoader::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    info!(
        config = %args.config.display(),
        break_windows = config.config().labor.break_windows.len(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %args.bind, "Listening");

    axum::serve(listener, router).await?;
    Ok(())
}

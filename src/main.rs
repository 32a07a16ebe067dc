//! Salescast Dashboard Server
//!
//! Run with: cargo run --bin salescast
//!
//! # Configuration
//!
//! Config file (first found): `~/.config/salescast/config.toml`,
//! `/etc/salescast/config.toml`, `./config.toml`, or `--config <path>`.
//!
//! Environment variables:
//! - `SALESCAST_HOST`: Host to bind to (default: 0.0.0.0)
//! - `SALESCAST_PORT`: Port to listen on (default: 8501)
//! - `SALESCAST_MAX_UPLOAD_BYTES`: Largest accepted upload (default: 10 MiB)
//! - `SALESCAST_INTERVAL_WIDTH`: Uncertainty interval width (default: 0.8)
//! - `SALESCAST_UNCERTAINTY_SAMPLES`: Draws for the interval (default: 1000)
//! - `SALESCAST_LOG_LEVEL` / `SALESCAST_LOG_FORMAT`: Logging (default: info / pretty)
//! - `RUST_LOG`: Full filter, wins over the level above

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use salescast::api::{serve, AppState};
use salescast::config::Config;

#[derive(Parser)]
#[command(name = "salescast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sales forecasting dashboard server")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    salescast::logging::init(&config.logging);

    tracing::info!("Starting Salescast v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        interval_width = config.forecast.interval_width,
        uncertainty_samples = config.forecast.uncertainty_samples,
        "Forecaster: prophet"
    );

    let state = AppState::from_config(&config);
    serve(state).await?;

    tracing::info!("Salescast stopped");
    Ok(())
}

//! Wave Finder API Server
//!
//! Serves leaflet-velocity wind fields and dive-site data.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use wavefinder_api::config::ApiConfig;
use wavefinder_api::{router, AppState};

/// Wave Finder API Server
#[derive(Parser, Debug)]
#[command(name = "wavefinder-api")]
#[command(about = "Wind field and dive-site API for the Wave Finder map")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3001", env = "WAVEFINDER_LISTEN_ADDR")]
    listen: String,

    /// Configuration file
    #[arg(short, long, default_value = "config/wavefinder.yaml", env = "WAVEFINDER_CONFIG")]
    config: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "WAVEFINDER_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    let mut config = ApiConfig::load(&args.config)?;
    config.apply_env_overrides()?;

    info!("Starting Wave Finder API server");

    let state = Arc::new(AppState::connect(config, Some(prometheus_handle)).await?);
    let app = router(state)?;

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

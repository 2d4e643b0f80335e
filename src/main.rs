//! formgate server
//!
//! Serves configured static mounts and a form echo endpoint on top of the
//! boundary layer.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ tower-http layers (request id, trace, timeout)
//!                          │
//!            ┌─────────────┴──────────────┐
//!            ▼                            ▼
//!     POST /forms                  GET|HEAD {mount}/{*path}
//!     body accumulator             path resolver
//!     content negotiator           static response builder
//!     form decoder → JSON          (ETag / 304)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use formgate::config::loader::{build_static_mounts, load_config};
use formgate::config::BoundaryConfig;
use formgate::observability::{logging, metrics};
use formgate::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "formgate")]
#[command(about = "Form decoding and static asset server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BoundaryConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("formgate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_request_body_bytes = ?config.limits.max_request_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        static_mounts = config.static_mounts.len(),
        "Configuration loaded"
    );

    let mounts = build_static_mounts(&config)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, mounts);
    let mut serving = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut serving => result??,
        _ = shutdown.trigger_on_ctrl_c() => serving.await??,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

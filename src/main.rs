//! Legacy card system gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request    ┌─────────┐    ┌──────────┐    ┌──────────┐
//!     ─────────────────▶│  http   │───▶│ gateway  │───▶│ routing  │
//!                       │ server  │    │          │    │ resolver │
//!                       └─────────┘    └────┬─────┘    └──────────┘
//!                                           │
//!                            ┌──────────────┼───────────────┐
//!                            ▼              ▼               ▼
//!                       ┌─────────┐   ┌──────────┐    ┌───────────┐
//!                       │  codec  │   │operations│    │    net    │───▶ Legacy
//!                       │ header/ │   │  field   │    │ transport │◀─── backend
//!                       │ charset │   │  tables  │    └───────────┘
//!                       └─────────┘   └──────────┘
//!
//!     Cross-cutting: config, catalog, observability (logs/metrics/audit), lifecycle
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use legacy_gateway::lifecycle::{self, signals};
use legacy_gateway::observability::{logging, metrics};
use legacy_gateway::{HttpServer, Shutdown};

#[derive(Debug, Parser)]
#[command(name = "legacy-gateway", version, about = "HTTP gateway to the legacy card system")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = lifecycle::configure(cli.config.as_deref(), |config| {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or(&config.observability.log_level);
        logging::init(level, config.observability.log_format)
    })?;

    tracing::info!("legacy-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        destinations = config.destinations.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration ready"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::trigger_on_signal(&trigger).await;
    });

    HttpServer::new(&config).run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

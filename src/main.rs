//! Quick balance service.
//!
//! Answers `GET /balance` with the current balance of one bank account,
//! fetched from the provider's sandbox (or production) API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     ───────────────────────▶│  http::server  ──▶  service::BalanceService   │
//!                             │                        │         │           │
//!                             │                        ▼         ▼           │
//!                             │                  cache::slot  provider::client ──────▶ Provider API
//!                             │                                              │
//!     Client Response         │  http::response ◀── reading / FetchError      │
//!     ◀───────────────────────│                                              │
//!                             │  config · lifecycle · observability · resilience │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use quick_balance::config::load_or_default;
use quick_balance::http::HttpServer;
use quick_balance::lifecycle::{startup, Shutdown};
use quick_balance::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "quick-balance")]
#[command(about = "Serve the current bank balance over HTTP", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_tracing(config.observability.json_logs);
    tracing::info!("quick-balance v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = ?config.provider.environment,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let service = startup::build_service(&config)?;

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = startup::bind(&config).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    let server = HttpServer::new(config, service);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

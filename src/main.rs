//! Edge Forwarder
//!
//! Stateless HTTP forwarding layer built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http::server ─▶ routing::router                │
//!                           │                      │                           │
//!                           │          ┌───────────┼────────────┐              │
//!                           │          ▼           ▼            ▼              │
//!                           │     GET / 302   metadata     mount prefix        │
//!                           │                      │            │              │
//!                           │                      ▼            ▼              │
//!                           │              upstream::Forwarder                 │
//!                           │   prefix strip → header policy → body policy     │
//!                           │                      │                           │
//!     Client Response       │                      ▼                           │
//!     ◀─────────────────────┼── redirect rewrite ◀─ hyper client ◀─────────────┼──── Upstream
//!                           └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use edge_forwarder::config::{read_config, ForwarderConfig};
use edge_forwarder::lifecycle::{startup, Shutdown};
use edge_forwarder::observability::logging;

#[derive(Parser)]
#[command(name = "edge-forwarder")]
#[command(about = "Stateless HTTP forwarder for a single fixed upstream", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "FORWARDER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long, env = "FORWARDER_BIND")]
    bind: Option<String>,

    /// Override the upstream base URL.
    #[arg(short, long, env = "FORWARDER_UPSTREAM_URL")]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ForwarderConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(upstream) = cli.upstream {
        config.upstream.base_url = upstream;
    }

    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "edge-forwarder starting");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

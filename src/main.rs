//! Clinic resilience gateway.
//!
//! Loads the TOML config, installs logging and metrics, then serves the
//! clinic API until SIGINT/SIGTERM.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use clinic_resilience::config::{load_config, GatewayConfig};
use clinic_resilience::lifecycle::{wait_for_signal, Shutdown};
use clinic_resilience::observability::{init_logging, metrics};
use clinic_resilience::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "clinic-resilience")]
#[command(about = "Clinic API gateway with retries, fallbacks and health tracking", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "CLINIC_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "clinic-resilience starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        unhealthy_threshold = config.fallback.unhealthy_threshold,
        retries_enabled = config.retries.enabled,
        rate_limit_enabled = config.rate_limit.enabled,
        "Configuration loaded"
    );

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
    let server = HttpServer::new(config)?;
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();

    server_task.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}

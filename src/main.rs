//! Lambda Multicast Proxy
//!
//! Each process run handles one API Gateway event and exits. For local
//! development the `serve` subcommand emulates the gateway over HTTP.
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!   API Gateway event    │               MULTICAST PROXY                │
//!  ──────────────────────┼─▶ lambda ──▶ routing ──▶ multicast           │
//!                        │   adapter     rewrite     dispatcher ────────┼──▶ primary
//!                        │                              │  │  │         │
//!                        │                              │  │  └─────────┼──▶ mirror
//!                        │                              │  └────────────┼──▶ mirror
//!   gateway response     │                              ▼               │
//!  ◀─────────────────────┼── lambda ◀── selector ◀── ResponseMap        │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use multicast_proxy::config;
use multicast_proxy::http::LocalServer;
use multicast_proxy::lambda::{
    normalize_incoming_request, response_to_gateway, ApiGatewayProxyEvent,
};
use multicast_proxy::observability::{logging, metrics};
use multicast_proxy::MulticastProxy;

#[derive(Parser)]
#[command(name = "multicast-proxy")]
#[command(
    about = "Replicate HTTP requests to several backends, answer with the first",
    long_about = None
)]
struct Cli {
    /// JSON or TOML config file. Defaults to $LAMBDA_MULTICAST_CONFIG.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one API Gateway event and print the response
    Invoke {
        /// Event file; read from stdin when omitted
        #[arg(short, long)]
        event: Option<PathBuf>,
    },
    /// Emulate API Gateway locally over HTTP
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        listen: String,

        /// Expose Prometheus metrics on this address
        #[arg(long)]
        metrics_address: Option<SocketAddr>,
    },
    /// Print the outbound URLs the config produces for a path
    Rewrite { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Arc::new(config::load(cli.config.as_deref())?);
    logging::init_logging(config.log_level, config.log_format);

    tracing::info!(
        rules = config.rewrite_config.rules().len(),
        proxy_timeout_ms = config.proxy_timeout.as_millis() as u64,
        "Multicast proxy started"
    );
    tracing::debug!(config = ?config, "Current config");

    match cli.command {
        Commands::Invoke { event } => {
            let raw = match event {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut raw = String::new();
                    std::io::stdin().read_to_string(&mut raw)?;
                    raw
                }
            };
            let event: ApiGatewayProxyEvent = serde_json::from_str(&raw)?;

            let proxy = MulticastProxy::from_config(config)?;
            let outgoing = proxy.handle(normalize_incoming_request(event)).await;
            println!("{}", serde_json::to_string(&response_to_gateway(outgoing))?);
        }
        Commands::Serve {
            listen,
            metrics_address,
        } => {
            if let Some(addr) = metrics_address {
                metrics::init_metrics(addr);
            }
            let proxy = Arc::new(MulticastProxy::from_config(config)?);
            let listener = TcpListener::bind(&listen).await?;
            LocalServer::new(proxy).run(listener, shutdown_signal()).await?;
        }
        Commands::Rewrite { path } => {
            for url in config.rewrite_config.rewrite(&path) {
                println!("{}", url);
            }
        }
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
    tracing::info!("Shutdown signal received");
}

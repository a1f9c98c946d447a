#![forbid(unsafe_code)]
//! HeartLedger node: serves the ledger over HTTP.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use heartledger::api::{run_api_server, Node};
use heartledger::config::load_config;
use heartledger::ledger::Ledger;
use heartledger::logging::{init_logging, LogFormat};

/// Hash-linked append-only ledger served over HTTP.
#[derive(Parser, Debug)]
#[command(name = "heartledger-node", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, short = 'c', env = "HEARTLEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on. Overrides `server.port`.
    #[arg(long = "addr", env = "ADDR")]
    port: Option<u16>,

    /// Interface to bind. Overrides `server.host`.
    #[arg(long, env = "HEARTLEDGER_HOST")]
    host: Option<String>,

    /// Default log level when RUST_LOG is unset. Overrides `logging.level`.
    #[arg(long)]
    log_level: Option<String>,

    /// "pretty" or "json". Overrides `logging.format`.
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    config.validate()?;

    init_logging(
        &config.logging.level,
        LogFormat::from_str_lossy(&config.logging.format),
    )?;
    debug!(?config, "configuration loaded");

    let ledger = Ledger::new();
    info!(
        "Starting HeartLedger node (genesis timestamp = {})",
        ledger.tip().timestamp
    );

    let node = Arc::new(Node::new(ledger));
    run_api_server(node, &config.listen_addr()).await
}

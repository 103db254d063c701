//! Explorer REST Server
//!
//! HTTP API for running parameter sweeps and browsing stored experiments.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use explorer::cli::init_logging;
use explorer::server::{startup::start_server, state::AppState};
use explorer::ExplorerConfig;

#[derive(Parser)]
#[command(name = "explorer_server")]
#[command(about = "Explorer REST API Server")]
#[command(version)]
struct Args {
  /// Server bind address, overrides the configured one
  #[arg(long)]
  bind: Option<SocketAddr>,

  /// Path to a JSON configuration file
  #[arg(long, env = "EXPLORER_CONFIG")]
  config: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_logging(args.verbose, "explorer=info,tower_http=info,warn");

  let config = ExplorerConfig::load(args.config.as_deref())?;
  let bind = match args.bind {
    Some(bind) => bind,
    None => config.server.bind.parse().with_context(|| format!("invalid bind address '{}'", config.server.bind))?,
  };

  info!("Starting Explorer REST Server v{}", env!("CARGO_PKG_VERSION"));
  if config.completion.api_key.is_none() {
    info!("OPENAI_API_KEY is not set, sweeps will record failed responses");
  }

  let state = AppState::from_config(&config)?;
  start_server(bind, state).await
}

mod api;
mod request;
mod resolver;
#[cfg(test)]
mod testing;

use clap::{CommandFactory, Parser};
use glossa_core::config::{self, Config};
use glossa_store::SqliteStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter};

#[derive(Parser)]
#[command(
    name = "glossa",
    version,
    about = "Glossa — read-only translation lookup gateway"
)]
struct Cli {
    /// Store node address (repeat for each replica).
    #[arg(short = 'n', long = "node")]
    nodes: Vec<String>,

    /// Store keyspace.
    #[arg(short, long)]
    keyspace: Option<String>,

    /// Listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to config file.
    #[arg(short, long, default_value = "glossa.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Start logging before the config is read; its level is applied once known.
    let (filter, filter_handle) = reload::Layer::new(initial_filter());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = load_config(&cli)?;
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        filter_handle.modify(|f| *f = EnvFilter::new(&cfg.server.log_level))?;
    }

    if cfg.store.nodes.is_empty() {
        eprintln!("{}", usage());
        std::process::exit(2);
    }

    info!("using store nodes: {:?}", cfg.store.nodes);
    info!("store keyspace: {}", cfg.store.keyspace);
    info!("listening port: {}", cfg.server.port);

    let store = Arc::new(SqliteStore::connect(&cfg.store)?);

    api::serve(&cfg.server, store.clone(), shutdown_signal()).await?;

    store.close().await;
    info!("shut down");
    Ok(())
}

/// `RUST_LOG` when set, `info` otherwise.
fn initial_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut cfg = config::load(&cli.config)?;
    if !cli.nodes.is_empty() {
        cfg.store.nodes = cli.nodes.clone();
    }
    if let Some(keyspace) = &cli.keyspace {
        cfg.store.keyspace = keyspace.clone();
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Error line and help text printed to stderr when no store node is configured.
fn usage() -> String {
    format!(
        "error: at least one store node is required (-n <NODE>)\n\n{}",
        Cli::command().render_help()
    )
}

/// Resolve on Ctrl-C so in-flight requests can finish.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}

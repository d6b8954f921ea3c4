//! HTTP server command
//!
//! Runs the counter pages and JSON API until Ctrl+C / SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use counterctl_core::{CounterConfig, CounterStore};
use counterctl_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: bind_addr from config, else 127.0.0.1:3030)
    #[arg(long, short = 'b', env = "COUNTERCTL_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: &CounterConfig) -> Result<()> {
    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => config
            .bind_socket_addr()
            .context("Invalid bind address in config")?,
    };

    tracing::info!(database_url = %config.database_url, "Starting counterctl server on {}", bind_addr);

    let store = CounterStore::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || config.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(store, server_config)
        .await
        .context("Server error")?;

    Ok(())
}

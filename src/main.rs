//! amz-gateway - HTTP facade for Amazon catalog search and pricing

use amz_gateway::config::{Config, Credentials};
use amz_gateway::server::{build_app, AppState};
use amz_gateway::spapi::client::SpApiClient;
use amz_gateway::spapi::marketplace::Marketplace;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-gateway",
    version,
    about = "HTTP facade for Amazon catalog search and pricing",
    long_about = "A thin HTTP gateway that forwards catalog searches and buy-box lookups \
to the Amazon Selling Partner API and flattens the responses for a front-end client."
)]
struct Cli {
    /// Marketplace to issue queries against
    #[arg(short, long, env = "AMZ_MARKETPLACE")]
    marketplace: Option<Marketplace>,

    /// Address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "AMZ_PORT")]
    port: Option<u16>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(marketplace) = cli.marketplace {
        config.marketplace = marketplace;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    // Credentials come strictly from the environment
    let credentials = Credentials::from_env()?;

    let client =
        SpApiClient::new(&config, credentials).context("Failed to create SP-API client")?;
    let app = build_app(AppState { catalog: Arc::new(client) });

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;

    info!("Listening on {} (marketplace: {})", config.bind_addr(), config.marketplace);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Received shutdown signal, starting graceful shutdown");
}

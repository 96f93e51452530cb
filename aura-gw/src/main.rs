//! AURA Gateway (aura-gw) - Main entry point
//!
//! Binds the HTTP surface the browser client talks to and relays
//! conversational traffic to hosted chat-completion providers.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use aura_common::config::load_config;
use aura_gw::providers::providers_from_env;
use aura_gw::{build_router, AppState};

/// Command-line arguments for aura-gw
#[derive(Parser, Debug)]
#[command(name = "aura-gw")]
#[command(about = "AURA assistant gateway")]
#[command(version)]
struct Args {
    /// Host to bind the listener to
    #[arg(long, env = "AURA_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "AURA_PORT")]
    port: Option<u16>,

    /// Path to a TOML config file
    #[arg(short, long, env = "AURA_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing first; everything after this is visible
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting AURA Gateway (aura-gw) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let providers = providers_from_env(&config);
    let credentialed = providers.iter().filter(|p| p.has_credential()).count();
    if credentialed == 0 {
        info!("No provider credentials found; conversational replies will use the local responder");
    } else {
        info!(providers = credentialed, "Provider credentials loaded");
    }

    let state = AppState::new(config.clone(), providers)?;
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("aura-gw listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

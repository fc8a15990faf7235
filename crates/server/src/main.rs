//! Recipe orchestration service.
//!
//! Serves `POST /find_recipes` and `GET /health`. Collaborator addresses are
//! required; the process refuses to start without them.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use server::{RecipeOrchestrator, StageArgs};

#[derive(Parser)]
#[command(name = "recipe-orchestrator")]
#[command(about = "Find and rank recipes for a set of ingredients", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    bind_addr: SocketAddr,

    #[command(flatten)]
    stages: StageArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = cli
        .stages
        .into_config()
        .context("Invalid collaborator configuration")?;
    let orchestrator = RecipeOrchestrator::new(config)?;

    let listener = TcpListener::bind(cli.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind_addr))?;
    info!("Recipe orchestrator listening on {}", cli.bind_addr);

    axum::serve(listener, server::http::router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Recipe orchestrator stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

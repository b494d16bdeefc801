//! Rallypoint - calendar availability sync service
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use rallypoint_api::utils::logging::init_tracing;
use rallypoint_api::{router, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = rallypoint_infra::config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env loaded"),
    }

    let bind_addr = config.server.bind_addr.clone();
    let ctx = Arc::new(AppContext::new_with_config(config).context("failed to build context")?);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "rallypoint listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("rallypoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

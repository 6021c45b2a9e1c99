//! Gateway service — binary entrypoint.
//! Loads configuration, wires the upstream gateway into the Axum router and
//! serves it on `PORT`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use feed_carousel::{api, init_tracing, metrics::Metrics, GatewayConfig, HttpGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    // Missing credentials stop the boot here rather than on first request.
    let cfg = GatewayConfig::from_env().context("loading gateway configuration")?;
    tracing::info!(
        port = cfg.port,
        user_agent = %cfg.user_agent,
        timeout_secs = cfg.timeout.as_secs(),
        cache_credentials = cfg.cache_credentials,
        "gateway configuration loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let gateway = HttpGateway::new(cfg).context("building upstream http client")?;

    let metrics = Metrics::init().context("installing prometheus recorder")?;
    let router = api::create_router(api::AppState::new(Arc::new(gateway))).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Server running on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

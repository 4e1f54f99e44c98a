//! Risk Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use bubble_risk_analyzer::api::AppState;
use bubble_risk_analyzer::config::ApiCredentials;
use bubble_risk_analyzer::metrics::Metrics;
use bubble_risk_analyzer::{api, providers};

use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bubble_risk_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let credentials = ApiCredentials::from_env();
    credentials.log_status();

    let metrics = Metrics::init();

    let state = AppState::new(
        Arc::new(providers::MockMarketData),
        Arc::new(providers::MockSentiment),
        credentials,
    );
    let router = api::create_router(state).merge(metrics.router());

    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "risk service listening");
    axum::serve(listener, router).await?;

    Ok(())
}

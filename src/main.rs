// =============================================================================
// MarketDeck — Main Entry Point
// =============================================================================
//
// Backend for the NSE equity dashboard: serves the stock directory,
// historical daily bars and derived technical indicators over REST.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod indicators;
mod market_data;
mod runtime_config;
mod stocks;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

const CONFIG_PATH: &str = "marketdeck_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        MarketDeck — NSE Dashboard Backend               ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Bind address from env takes precedence over the config file.
    if let Ok(addr) = std::env::var("MARKETDECK_BIND_ADDR") {
        config.bind_addr = addr;
    }

    info!(
        bind_addr = %config.bind_addr,
        default_period = %config.default_period,
        directory_ttl_minutes = config.directory_ttl_minutes,
        "configuration resolved"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config));

    // ── 3. Prime the stock directory in the background ───────────────────
    // The server starts serving immediately on the built-in fallback list;
    // the live listing swaps in as soon as the fetch completes.
    let prime_state = state.clone();
    tokio::spawn(async move {
        prime_state.refresh_directory_if_stale().await;
        info!(
            provenance = ?prime_state.directory.provenance(),
            count = prime_state.directory.listings().len(),
            "stock directory primed"
        );
    });

    // ── 4. Start the API server ──────────────────────────────────────────
    let bind_addr = state.runtime_config.read().bind_addr.clone();
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {bind_addr}: {e}"))?;
    info!(addr = %bind_addr, "API server listening");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");
    server.abort();

    if let Err(e) = state.runtime_config.read().save(CONFIG_PATH) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("MarketDeck shut down complete.");
    Ok(())
}

// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The dashboard is a read-only public
// viewer, so there is no authentication; CORS is configured permissively so
// the browser frontend can be served from anywhere during development.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::indicators::{self, IndicatorSeries, LatestIndicators};
use crate::market_data::{PriceBar, SummaryStats};
use crate::types::Period;

/// Shorthand for the structured JSON error responses.
type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.to_string() })))
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/periods", get(periods))
        .route("/api/v1/stocks", get(stocks))
        .route("/api/v1/stocks/refresh", post(stocks_refresh))
        .route("/api/v1/history/:symbol", get(history))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Periods
// =============================================================================

async fn periods() -> impl IntoResponse {
    let entries: Vec<serde_json::Value> = Period::all()
        .iter()
        .map(|p| {
            serde_json::json!({
                "code": p.code(),
                "label": p.to_string(),
                "days": p.days(),
            })
        })
        .collect();
    Json(entries)
}

// =============================================================================
// Stock directory
// =============================================================================

async fn stocks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // TTL check on read; the refresh itself only runs when stale.
    state.refresh_directory_if_stale().await;

    let listings = state.directory.listings();
    Json(serde_json::json!({
        "count": listings.len(),
        "provenance": state.directory.provenance(),
        "refreshed_at": state.directory.refreshed_at(),
        "stocks": listings,
    }))
}

async fn stocks_refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let outcome = state.directory.refresh_from(&state.listing_source).await;
    state.increment_version();
    info!(outcome = ?outcome, "directory refresh requested via API");

    Json(serde_json::json!({
        "provenance": outcome,
        "refreshed_at": state.directory.refreshed_at(),
        "count": state.directory.listings().len(),
    }))
}

// =============================================================================
// History + indicators
// =============================================================================

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default)]
    period: Option<String>,
}

/// Everything the dashboard renders for one symbol: the raw bars, the
/// aligned indicator columns, the summary metric row, and the latest
/// indicator block with its RSI classification.
#[derive(Serialize)]
struct HistoryResponse {
    symbol: String,
    company: Option<String>,
    period: &'static str,
    bars: Vec<PriceBar>,
    indicators: IndicatorSeries,
    summary: SummaryStats,
    latest: LatestIndicators,
}

async fn history(
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "symbol must not be empty"));
    }

    let period = match &query.period {
        Some(raw) => raw
            .parse::<Period>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
        None => state.runtime_config.read().default_period,
    };

    let series = state.quotes.fetch_daily(&symbol, period).await.map_err(|e| {
        warn!(symbol = %symbol, error = %e, "history fetch failed");
        api_error(StatusCode::BAD_GATEWAY, e)
    })?;

    // A validated series is non-empty and the windows are fixed constants,
    // so enrich only fails if those invariants are broken.
    let enriched = indicators::engine::enrich(&series)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    let summary = series.summary();
    let latest = enriched.latest();
    let company = state.directory.company_name(&symbol);

    Ok(Json(HistoryResponse {
        symbol,
        company,
        period: period.code(),
        bars: series.bars().to_vec(),
        indicators: enriched,
        summary,
        latest,
    }))
}

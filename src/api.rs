use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::OnceCell;
use regex::Regex;
use tower_http::cors::CorsLayer;

use crate::config::ApiCredentials;
use crate::history::History;
use crate::providers::{
    MarketDataSource, MockMarketData, MockSentiment, Quote, SentimentSource,
};
use crate::report::RiskAssessment;
use crate::risk::rules::HotReloadRules;
use crate::risk::score::assess;
use crate::risk::weights::{HotReloadWeights, Weights};
use crate::risk::RiskInputs;
use crate::snapshot;

#[derive(Clone)]
pub struct AppState {
    rules: Arc<HotReloadRules>,
    weights: Arc<HotReloadWeights>,
    history: Arc<History>,
    market: Arc<dyn MarketDataSource>,
    sentiment: Arc<dyn SentimentSource>,
    credentials: ApiCredentials,
}

impl AppState {
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        sentiment: Arc<dyn SentimentSource>,
        credentials: ApiCredentials,
    ) -> Self {
        Self {
            rules: Arc::new(HotReloadRules::new(None)),
            weights: Arc::new(HotReloadWeights::new(None)),
            history: Arc::new(History::with_capacity(2000)),
            market,
            sentiment,
            credentials,
        }
    }

    /// State wired to the demo data sources; used by the binary when no live
    /// providers exist and by integration tests.
    pub fn with_mock_sources() -> Self {
        Self::new(
            Arc::new(MockMarketData),
            Arc::new(MockSentiment),
            ApiCredentials::from_env(),
        )
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/score", post(score))
        .route("/score/demo", get(score_demo))
        .route("/score/snapshot", get(score_snapshot))
        .route("/regime", get(regime))
        .route("/quotes", get(quotes))
        .route("/debug/weights", get(debug_weights))
        .route("/debug/history", get(debug_history))
        .route("/admin/reload-config", get(admin_reload_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Run one assessment against the live rule/weight config and record it.
fn run_assessment(state: &AppState, inputs: &RiskInputs) -> RiskAssessment {
    let ruleset = state.rules.current();
    let weights = state.weights.current();
    let a = assess(inputs, &ruleset, &weights);
    state.history.push(&a);
    crate::metrics::record_assessment(&a);
    a
}

#[derive(serde::Serialize)]
struct HealthResp {
    status: &'static str,
    live_keys: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResp> {
    Json(HealthResp {
        status: "ok",
        live_keys: state.credentials.live_keys(),
    })
}

async fn score(
    State(state): State<AppState>,
    Json(inputs): Json<RiskInputs>,
) -> Json<RiskAssessment> {
    Json(run_assessment(&state, &inputs))
}

async fn score_demo(State(state): State<AppState>) -> Json<RiskAssessment> {
    Json(run_assessment(&state, &snapshot::demo_inputs()))
}

#[derive(serde::Deserialize)]
struct SnapshotQuery {
    #[serde(default = "default_symbol")]
    symbol: String,
}

fn default_symbol() -> String {
    "NVDA".to_string()
}

/// Assess a provider-backed snapshot for one symbol, layered over the demo
/// analyst metrics.
async fn score_snapshot(
    State(state): State<AppState>,
    Query(q): Query<SnapshotQuery>,
) -> Result<Json<RiskAssessment>, StatusCode> {
    if !valid_symbol(&q.symbol) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let inputs = snapshot::gather(
        state.market.as_ref(),
        state.sentiment.as_ref(),
        &q.symbol,
        &snapshot::demo_inputs(),
    )
    .await
    .map_err(|e| {
        tracing::warn!(error = ?e, symbol = %q.symbol, "snapshot gather failed");
        StatusCode::BAD_GATEWAY
    })?;
    Ok(Json(run_assessment(&state, &inputs)))
}

#[derive(serde::Deserialize)]
struct RegimeQuery {
    score: i64,
}

#[derive(serde::Serialize)]
struct RegimeResp {
    score: u32,
    regime: crate::risk::regime::Regime,
    color: &'static str,
}

async fn regime(Query(q): Query<RegimeQuery>) -> Result<Json<RegimeResp>, StatusCode> {
    if !(0..=100).contains(&q.score) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let score = q.score as u32;
    let regime = crate::risk::regime::Regime::from_score(score);
    Ok(Json(RegimeResp {
        score,
        regime,
        color: regime.color(),
    }))
}

#[derive(serde::Deserialize)]
struct QuotesQuery {
    symbols: String,
}

fn valid_symbol(s: &str) -> bool {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"^[A-Z.]{1,6}$").expect("symbol regex"));
    re.is_match(s)
}

async fn quotes(
    State(state): State<AppState>,
    Query(q): Query<QuotesQuery>,
) -> Result<Json<Vec<Quote>>, StatusCode> {
    let symbols: Vec<&str> = q
        .symbols
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if symbols.is_empty() || symbols.iter().any(|s| !valid_symbol(s)) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut out = Vec::with_capacity(symbols.len());
    for sym in symbols {
        let quote = state.market.quote(sym).await.map_err(|e| {
            tracing::warn!(error = ?e, symbol = sym, "quote fetch failed");
            StatusCode::BAD_GATEWAY
        })?;
        out.push(quote);
    }
    Ok(Json(out))
}

async fn debug_weights(State(state): State<AppState>) -> Json<Weights> {
    Json(state.weights.current())
}

#[derive(serde::Serialize)]
struct HistoryOut {
    ts_unix: u64,
    overall_score: u32,
    regime: String,
    top_drivers: Vec<String>,
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryOut>> {
    let rows = state.history.snapshot_last_n(10);
    let out = rows
        .into_iter()
        .map(|h| HistoryOut {
            ts_unix: h.ts_unix,
            overall_score: h.overall_score,
            regime: h.regime.label().to_string(),
            top_drivers: h.top_drivers,
        })
        .collect::<Vec<_>>();
    Json(out)
}

async fn admin_reload_config(State(state): State<AppState>) -> &'static str {
    state.rules.force_reload();
    state.weights.force_reload();
    // current() re-reads eagerly so a broken file surfaces in logs now.
    let _ = state.rules.current();
    let _ = state.weights.current();
    "reloaded"
}

//! Snapshot assembly: pull one quote and one sentiment record from the
//! configured sources and merge them into a `RiskInputs` record on top of
//! caller-supplied analyst metrics.
//!
//! Provider-backed fields overwrite the analyst baseline; everything a
//! provider does not cover (margins, spreads, options surface) stays as
//! supplied. Scoring itself never touches a provider.

use anyhow::Result;
use tracing::debug;

use crate::providers::{MarketDataSource, SentimentSource};
use crate::risk::RiskInputs;

/// Gather provider data for `symbol` and fold it into `analyst` metrics.
///
/// Mapping:
/// - quote percent change → `fundamentals.price_change` as a fraction
/// - sentiment score → `sentiment.news_sentiment`
/// - sentiment intensity → `sentiment.narrative_intensity`
pub async fn gather(
    market: &dyn MarketDataSource,
    sentiment: &dyn SentimentSource,
    symbol: &str,
    analyst: &RiskInputs,
) -> Result<RiskInputs> {
    let quote = market.quote(symbol).await?;
    let record = sentiment.sentiment(symbol).await?;

    debug!(
        symbol,
        market = market.name(),
        sentiment = sentiment.name(),
        price = quote.price,
        "snapshot gathered"
    );

    let mut inputs = analyst.clone();
    inputs
        .fundamentals
        .set("price_change", quote.change_pct / 100.0);
    inputs.sentiment.set("news_sentiment", record.sentiment);
    inputs
        .sentiment
        .set("narrative_intensity", record.intensity);
    Ok(inputs)
}

/// The built-in demo snapshot. Assessing it with the seed rules and default
/// weights yields overall 46, Late-Cycle Froth.
pub fn demo_inputs() -> RiskInputs {
    let mut inputs = RiskInputs::default();
    inputs.fundamentals = [
        ("fcf_margin", -0.02),
        ("revenue_growth", 0.15),
        ("price_change", 0.25),
    ]
    .into_iter()
    .collect();
    inputs.valuation = [
        ("pe_ratio", 65.0),
        ("price_to_sales", 25.0),
        ("market_cap_growth", 2.5),
    ]
    .into_iter()
    .collect();
    inputs.leverage = [
        ("credit_spreads", 2.5),
        ("breadth", 0.25),
        ("leverage_ratio", 4.0),
    ]
    .into_iter()
    .collect();
    inputs.options = [("iv_level", 0.18), ("skew", 0.12), ("put_call_ratio", 0.7)]
        .into_iter()
        .collect();
    inputs.sentiment = [
        ("news_sentiment", 0.85),
        ("social_sentiment", 0.92),
        ("narrative_intensity", 0.75),
    ]
    .into_iter()
    .collect();
    inputs
}

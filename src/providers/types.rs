// src/providers/types.rs
use anyhow::Result;

/// One stock quote as the aggregator needs it: numeric fields only, no
/// provider-specific payloads.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    /// Percent change on the day, e.g. 2.4 for +2.4%.
    pub change_pct: f64,
    pub volume: u64,
    pub market_cap: u64,
}

/// Aggregate news sentiment for a query.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct SentimentRecord {
    /// Sentiment score in [-1, 1].
    pub sentiment: f64,
    /// Narrative intensity in [0, 1].
    pub intensity: f64,
    pub article_count: u32,
}

#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<Quote>;
    fn name(&self) -> &'static str;
}

#[async_trait::async_trait]
pub trait SentimentSource: Send + Sync {
    async fn sentiment(&self, query: &str) -> Result<SentimentRecord>;
    fn name(&self) -> &'static str;
}

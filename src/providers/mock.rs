//! Demo data sources drawing uniformly from fixed ranges.
//!
//! These stand in for the real quote/news providers; the ranges are the same
//! whether or not API credentials are configured, so credential presence
//! never changes the shape of data the aggregator sees. Tests that need
//! determinism use the fixture sources instead.

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;

use super::types::{MarketDataSource, Quote, SentimentRecord, SentimentSource};

#[derive(Debug, Clone, Copy, Default)]
pub struct MockMarketData;

#[async_trait]
impl MarketDataSource for MockMarketData {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        let mut rng = rand::rng();
        Ok(Quote {
            symbol: symbol.to_string(),
            price: rng.random_range(50.0..500.0),
            change_pct: rng.random_range(-10.0..10.0),
            volume: rng.random_range(1_000_000..10_000_000),
            market_cap: rng.random_range(100_000_000_000..1_000_000_000_000),
        })
    }

    fn name(&self) -> &'static str {
        "mock-market"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockSentiment;

#[async_trait]
impl SentimentSource for MockSentiment {
    async fn sentiment(&self, _query: &str) -> Result<SentimentRecord> {
        let mut rng = rand::rng();
        Ok(SentimentRecord {
            sentiment: rng.random_range(-1.0..1.0),
            intensity: rng.random_range(0.0..1.0),
            article_count: rng.random_range(10..100),
        })
    }

    fn name(&self) -> &'static str {
        "mock-sentiment"
    }
}

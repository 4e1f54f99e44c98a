//! Deterministic sources for tests: fixed records, no randomness.

use anyhow::Result;
use async_trait::async_trait;

use super::types::{MarketDataSource, Quote, SentimentRecord, SentimentSource};

/// Always returns the configured quote, restamped with the requested symbol.
#[derive(Debug, Clone)]
pub struct FixtureMarketData {
    pub quote: Quote,
}

impl Default for FixtureMarketData {
    fn default() -> Self {
        Self {
            quote: Quote {
                symbol: String::new(),
                price: 875.30,
                change_pct: 2.4,
                volume: 5_000_000,
                market_cap: 500_000_000_000,
            },
        }
    }
}

#[async_trait]
impl MarketDataSource for FixtureMarketData {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        Ok(Quote {
            symbol: symbol.to_string(),
            ..self.quote.clone()
        })
    }

    fn name(&self) -> &'static str {
        "fixture-market"
    }
}

/// Always returns the configured sentiment record.
#[derive(Debug, Clone)]
pub struct FixtureSentiment {
    pub record: SentimentRecord,
}

impl Default for FixtureSentiment {
    fn default() -> Self {
        Self {
            record: SentimentRecord {
                sentiment: 0.72,
                intensity: 0.75,
                article_count: 42,
            },
        }
    }
}

#[async_trait]
impl SentimentSource for FixtureSentiment {
    async fn sentiment(&self, _query: &str) -> Result<SentimentRecord> {
        Ok(self.record.clone())
    }

    fn name(&self) -> &'static str {
        "fixture-sentiment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixtures_are_deterministic() {
        let m = FixtureMarketData::default();
        let a = m.quote("AMD").await.unwrap();
        let b = m.quote("AMD").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.symbol, "AMD");

        let s = FixtureSentiment::default();
        assert_eq!(
            s.sentiment("x").await.unwrap(),
            s.sentiment("y").await.unwrap()
        );
    }
}

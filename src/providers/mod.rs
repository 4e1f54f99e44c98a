// src/providers/mod.rs
pub mod fixture;
pub mod mock;
pub mod types;

pub use fixture::{FixtureMarketData, FixtureSentiment};
pub use mock::{MockMarketData, MockSentiment};
pub use types::{MarketDataSource, Quote, SentimentRecord, SentimentSource};

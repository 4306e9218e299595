//! External collaborators: market data, news, social and screener feeds.
//!
//! Each concern sits behind an async trait so the scoring core can be driven
//! by in-process fakes in tests.

pub mod candidates;
pub mod finnhub;
pub mod newsapi;
pub mod reddit;
pub mod stocktwits;
pub mod yahoo;

pub use candidates::{CandidateGroup, CandidateListing, CandidateService, DEFAULT_CANDIDATES};
pub use finnhub::FinnhubNewsClient;
pub use newsapi::NewsApiClient;
pub use reddit::RedditClient;
pub use stocktwits::StockTwitsClient;
pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::types::{HistoryPeriod, PriceHistory, SocialPost, StockInfo};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Browser-like agent; several public endpoints reject library defaults.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Shared HTTP client builder with a per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Price history and descriptive metadata for a ticker.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `period`. An empty history is a `DataUnavailable` error.
    async fn fetch_history(&self, ticker: &str, period: HistoryPeriod) -> Result<PriceHistory>;

    /// Name, sector, price and size information.
    async fn fetch_metadata(&self, ticker: &str) -> Result<StockInfo>;
}

/// A provider of recent headlines for a ticker.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Reported as the reading's `source`.
    fn name(&self) -> &str;

    async fn fetch_headlines(&self, ticker: &str) -> Result<Vec<String>>;
}

/// A provider of recent social messages for a ticker.
#[async_trait]
pub trait SocialSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_posts(&self, ticker: &str) -> Result<Vec<SocialPost>>;
}

/// A screener that lists tickers for a candidate group.
#[async_trait]
pub trait ScreenSource: Send + Sync {
    async fn screen(&self, group: CandidateGroup) -> Result<Vec<String>>;
}

//! In-process fakes for the external collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use surge_radar::error::{AppError, Result};
use surge_radar::services::surge::ForestParams;
use surge_radar::services::{ModelRegistry, SentimentAggregator, SurgeEngine};
use surge_radar::sources::{CandidateGroup, MarketDataProvider, NewsSource, ScreenSource, SocialSource};
use surge_radar::types::{Bar, HistoryPeriod, PriceHistory, SocialPost, StockInfo};
use tokio::sync::Notify;

/// Bars kept for the three-month window.
pub const THREE_MONTH_BARS: usize = 63;

/// A wavy, slowly rising series with varying volume. Swings are large enough
/// that some 5-day windows gain more than 5% and others do not.
pub fn wavy_bars(n: usize, phase: f64) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + 0.05 * t + 9.0 * (t / 4.0 + phase).sin() + 2.0 * (t / 1.7).cos();
            let volume = 1_000_000.0 + 400_000.0 * (t / 3.0 + phase).sin().abs() + 10_000.0 * (i % 7) as f64;
            Bar {
                date: start + Duration::days(i as i64),
                open: close * 0.995,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume,
            }
        })
        .collect()
}

/// Monotonically rising closes with rising volume.
pub fn rising_bars(n: usize) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 50.0 + i as f64;
            Bar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000_000.0 + 50_000.0 * i as f64,
            }
        })
        .collect()
}

pub fn info(ticker: &str, price: f64) -> StockInfo {
    StockInfo {
        ticker: ticker.to_string(),
        name: format!("{} Inc.", ticker),
        sector: "Technology".to_string(),
        industry: "Software".to_string(),
        market_cap: 1.0e9,
        current_price: price,
        previous_close: price,
        fifty_two_week_high: price * 1.2,
        fifty_two_week_low: price * 0.8,
        avg_volume: 1.0e6,
    }
}

/// Market data served from memory.
///
/// `OneYear` returns the full series, `ThreeMonths` its last 63 bars.
/// Unknown tickers fail with `DataUnavailable`; missing metadata fails with
/// `ExternalApi`.
#[derive(Default)]
pub struct MockMarket {
    histories: HashMap<String, Vec<Bar>>,
    metadata: HashMap<String, StockInfo>,
    pub history_calls: AtomicUsize,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl MockMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.histories.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_metadata(mut self, info: StockInfo) -> Self {
        self.metadata.insert(info.ticker.clone(), info);
        self
    }

    /// Every history fetch signals `entered`, then waits on `release`.
    pub fn gated(mut self, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.gate = Some((entered, release));
        self
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for MockMarket {
    async fn fetch_history(&self, ticker: &str, period: HistoryPeriod) -> Result<PriceHistory> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }

        let bars = self
            .histories
            .get(ticker)
            .ok_or_else(|| AppError::unavailable(ticker, "no price history"))?;
        let bars = match period {
            HistoryPeriod::OneYear => bars.clone(),
            HistoryPeriod::ThreeMonths => bars[bars.len().saturating_sub(THREE_MONTH_BARS)..].to_vec(),
        };
        Ok(PriceHistory::new(bars))
    }

    async fn fetch_metadata(&self, ticker: &str) -> Result<StockInfo> {
        self.metadata
            .get(ticker)
            .cloned()
            .ok_or_else(|| AppError::ExternalApi(format!("no metadata for {}", ticker)))
    }
}

/// News provider returning fixed headlines, or failing.
pub struct MockNews {
    name: &'static str,
    headlines: Option<Vec<String>>,
}

impl MockNews {
    pub fn new(name: &'static str, headlines: &[&str]) -> Self {
        Self {
            name,
            headlines: Some(headlines.iter().map(|h| h.to_string()).collect()),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self { name, headlines: None }
    }
}

#[async_trait]
impl NewsSource for MockNews {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch_headlines(&self, _ticker: &str) -> Result<Vec<String>> {
        self.headlines
            .clone()
            .ok_or_else(|| AppError::ExternalApi(format!("{} is down", self.name)))
    }
}

/// Social provider returning fixed posts, or failing.
pub struct MockSocial {
    name: &'static str,
    posts: Option<Vec<SocialPost>>,
}

impl MockSocial {
    pub fn new(name: &'static str, posts: Vec<SocialPost>) -> Self {
        Self { name, posts: Some(posts) }
    }

    pub fn failing(name: &'static str) -> Self {
        Self { name, posts: None }
    }
}

#[async_trait]
impl SocialSource for MockSocial {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch_posts(&self, _ticker: &str) -> Result<Vec<SocialPost>> {
        self.posts
            .clone()
            .ok_or_else(|| AppError::ExternalApi(format!("{} is down", self.name)))
    }
}

/// Screens returning fixed lists; groups without a list fail.
#[derive(Default)]
pub struct MockScreens {
    lists: HashMap<CandidateGroup, Vec<String>>,
}

impl MockScreens {
    pub fn with(mut self, group: CandidateGroup, tickers: &[&str]) -> Self {
        self.lists.insert(group, tickers.iter().map(|t| t.to_string()).collect());
        self
    }
}

#[async_trait]
impl ScreenSource for MockScreens {
    async fn screen(&self, group: CandidateGroup) -> Result<Vec<String>> {
        self.lists
            .get(&group)
            .cloned()
            .ok_or_else(|| AppError::ExternalApi(format!("screen {} unavailable", group)))
    }
}

/// Aggregator with no providers: always the neutral 50.
pub fn silent_sentiment() -> Arc<SentimentAggregator> {
    Arc::new(SentimentAggregator::new(Vec::new(), Vec::new()))
}

/// Small forest so training tests stay fast.
pub fn quick_forest() -> ForestParams {
    ForestParams {
        n_trees: 15,
        max_depth: 6,
        min_samples_split: 2,
        seed: 7,
    }
}

pub fn engine(market: Arc<MockMarket>, registry: Arc<ModelRegistry>, max_workers: usize) -> SurgeEngine {
    SurgeEngine::with_forest_params(market, silent_sentiment(), registry, max_workers, quick_forest())
}

/// Unique scratch path under the system temp dir.
pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("surge-radar-{}-{}", uuid::Uuid::new_v4(), name))
}

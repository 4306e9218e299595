//! Composite per-ticker scoring.

use super::sentiment::SentimentAggregator;
use super::technical::TechnicalEngine;
use super::volume_momentum::volume_momentum_score;
use crate::error::Result;
use crate::sources::MarketDataProvider;
use crate::types::{round_to, HistoryPeriod, ScoreResult, ScoreStatus, StockInfo};
use std::sync::Arc;
use tracing::{debug, warn};

pub const TECHNICAL_WEIGHT: f64 = 0.4;
pub const SENTIMENT_WEIGHT: f64 = 0.3;
pub const VOLUME_WEIGHT: f64 = 0.3;
/// Bars attached to each result for charting.
pub const PRICE_HISTORY_BARS: usize = 30;

/// Weighted total of the three sub-scores, rounded to one decimal.
pub fn weighted_total(technical: f64, sentiment: f64, volume: f64) -> f64 {
    round_to(
        technical * TECHNICAL_WEIGHT + sentiment * SENTIMENT_WEIGHT + volume * VOLUME_WEIGHT,
        1,
    )
}

/// Combines technical, sentiment and volume/momentum scores for one ticker.
pub struct CompositeScorer {
    market: Arc<dyn MarketDataProvider>,
    sentiment: Arc<SentimentAggregator>,
    technical: TechnicalEngine,
}

impl CompositeScorer {
    pub fn new(market: Arc<dyn MarketDataProvider>, sentiment: Arc<SentimentAggregator>) -> Self {
        Self {
            market,
            sentiment,
            technical: TechnicalEngine::default(),
        }
    }

    /// Score `ticker`. A missing price history fails the ticker; missing
    /// metadata falls back to defaults. The surge fields are left at the
    /// no-model sentinel for the caller to fill in.
    pub async fn score(&self, ticker: &str) -> Result<ScoreResult> {
        let ticker = ticker.trim().to_uppercase();

        let (history, metadata) = tokio::join!(
            self.market.fetch_history(&ticker, HistoryPeriod::ThreeMonths),
            self.market.fetch_metadata(&ticker),
        );
        let history = history?;
        let info = metadata.unwrap_or_else(|e| {
            warn!("Metadata unavailable for {}: {}", ticker, e);
            StockInfo::unknown(&ticker)
        });

        let sentiment = self.sentiment.analyze(&ticker).await;
        let technical = self.technical.analyze(history.bars());
        let volume = volume_momentum_score(history.bars());

        let last_close = history.last().map(|b| b.close).unwrap_or(0.0);
        let current_price = if info.current_price > 0.0 {
            info.current_price
        } else {
            last_close
        };

        let total = weighted_total(technical.score, sentiment.score, volume.score);
        debug!(
            "{}: total {} (technical {}, sentiment {}, volume {})",
            ticker, total, technical.score, sentiment.score, volume.score
        );

        Ok(ScoreResult {
            name: info.name,
            sector: info.sector,
            current_price: round_to(current_price, 2),
            total_score: total,
            technical_score: round_to(technical.score, 1),
            technical_status: technical.status,
            sentiment_score: round_to(sentiment.score, 1),
            volume_score: round_to(volume.score, 1),
            volume_status: volume.status,
            ml_surge_probability: 50.0,
            ml_status: ScoreStatus::NoModel,
            signals: technical.signals,
            indicators: technical.indicators,
            sentiment_detail: sentiment,
            price_history: history.tail_points(PRICE_HISTORY_BARS),
            ticker,
        })
    }
}

use serde::{Deserialize, Serialize};

use super::signals::{empty_as_none, snapshot_or_empty};
use super::{round_to, IndicatorSnapshot, PricePoint, ScoreStatus, SentimentDetail, Signal};

/// Descriptive metadata for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    pub ticker: String,
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub market_cap: f64,
    pub current_price: f64,
    pub previous_close: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
    pub avg_volume: f64,
}

impl StockInfo {
    /// Defaults that still echo the ticker back.
    pub fn unknown(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            sector: "N/A".to_string(),
            industry: "N/A".to_string(),
            market_cap: 0.0,
            current_price: 0.0,
            previous_close: 0.0,
            fifty_two_week_high: 0.0,
            fifty_two_week_low: 0.0,
            avg_volume: 0.0,
        }
    }
}

/// Surge classifier output for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurgeEstimate {
    /// 0-100, rounded to one decimal.
    pub probability: f64,
    pub status: ScoreStatus,
}

impl SurgeEstimate {
    /// Neutral 50.0 with the reason it was not computed.
    pub fn neutral(status: ScoreStatus) -> Self {
        Self {
            probability: 50.0,
            status,
        }
    }

    pub fn computed(probability: f64) -> Self {
        Self {
            probability: round_to(probability, 1),
            status: ScoreStatus::Computed,
        }
    }
}

/// Full scoring record for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub ticker: String,
    pub name: String,
    pub sector: String,
    pub current_price: f64,
    pub total_score: f64,
    pub technical_score: f64,
    pub technical_status: ScoreStatus,
    pub sentiment_score: f64,
    pub volume_score: f64,
    pub volume_status: ScoreStatus,
    pub ml_surge_probability: f64,
    pub ml_status: ScoreStatus,
    pub signals: Vec<Signal>,
    #[serde(default, serialize_with = "snapshot_or_empty", deserialize_with = "empty_as_none")]
    pub indicators: Option<IndicatorSnapshot>,
    pub sentiment_detail: SentimentDetail,
    /// Last 30 bars.
    pub price_history: Vec<PricePoint>,
}

impl ScoreResult {
    /// Attach the classifier output, consuming the unpublished record.
    pub fn with_surge(mut self, estimate: SurgeEstimate) -> Self {
        self.ml_surge_probability = estimate.probability;
        self.ml_status = estimate.status;
        self
    }
}

/// Score distribution of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreStats {
    /// total_score >= 70
    pub strong: usize,
    /// 60 <= total_score < 70
    pub moderate: usize,
    /// total_score < 60
    pub weak: usize,
    pub top_score: f64,
}

impl ScoreStats {
    /// Summarize results already sorted by descending total score.
    pub fn from_ranked(results: &[ScoreResult]) -> Self {
        let mut stats = ScoreStats::default();
        for r in results {
            if r.total_score >= 70.0 {
                stats.strong += 1;
            } else if r.total_score >= 60.0 {
                stats.moderate += 1;
            } else {
                stats.weak += 1;
            }
        }
        stats.top_score = results.first().map(|r| round_to(r.total_score, 1)).unwrap_or(0.0);
        stats
    }
}

/// Ranked output of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Sorted by descending total score.
    pub results: Vec<ScoreResult>,
    /// Tickers that could not be scored, in input order.
    pub failed: Vec<String>,
    pub stats: ScoreStats,
    pub elapsed_seconds: f64,
}

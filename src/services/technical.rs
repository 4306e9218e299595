//! Technical analysis engine: runs every indicator rule over a history and
//! folds the adjustments into one bounded score.

use crate::services::indicators::{all_rules, rsi::rsi, volume::volume_ratio, MacdSeries, TechnicalRule};
use crate::types::{closes, round_to, volumes, Bar, IndicatorSnapshot, ScoreStatus, TechnicalAnalysis};
use tracing::debug;

/// Bars required before any rule is evaluated.
pub const MIN_TECHNICAL_BARS: usize = 30;

const NEUTRAL_SCORE: f64 = 50.0;

/// Evaluates the indicator rules in a fixed order.
pub struct TechnicalEngine {
    rules: Vec<Box<dyn TechnicalRule>>,
}

impl Default for TechnicalEngine {
    fn default() -> Self {
        Self { rules: all_rules() }
    }
}

impl TechnicalEngine {
    pub fn new(rules: Vec<Box<dyn TechnicalRule>>) -> Self {
        Self { rules }
    }

    /// Score a history. Fewer than 30 bars yields the insufficient-data sentinel.
    pub fn analyze(&self, bars: &[Bar]) -> TechnicalAnalysis {
        if bars.len() < MIN_TECHNICAL_BARS {
            debug!("Technical analysis skipped: {} bars", bars.len());
            return TechnicalAnalysis::insufficient();
        }

        let mut score = NEUTRAL_SCORE;
        let mut signals = Vec::new();
        for rule in &self.rules {
            if let Some(hit) = rule.evaluate(bars) {
                score += hit.delta;
                signals.push(hit.signal);
            }
        }

        TechnicalAnalysis {
            score: round_to(score.clamp(0.0, 100.0), 1),
            status: ScoreStatus::Computed,
            signals,
            indicators: Some(snapshot(bars)),
        }
    }
}

/// Latest indicator readings, rounded for display.
pub fn snapshot(bars: &[Bar]) -> IndicatorSnapshot {
    let closes = closes(bars);
    let histogram = MacdSeries::standard(&closes).last_histogram();

    IndicatorSnapshot {
        rsi: rsi(&closes, 14).map(|v| round_to(v, 2)),
        macd_histogram: histogram.filter(|h| h.is_finite()).map(|h| round_to(h, 4)),
        volume_ratio: Some(round_to(volume_ratio(&volumes(bars), 20), 2)),
        current_price: closes.last().map(|c| round_to(*c, 2)),
    }
}

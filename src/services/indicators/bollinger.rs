//! Bollinger Bands indicator.

use super::{mean, sample_std, tail, RuleHit, TechnicalRule};
use crate::types::{closes, Bar, Signal};

/// Guards the band-width division when the bands collapse.
const EPSILON: f64 = 1e-10;

/// Bands of the latest window: SMA(period) +/- k sample standard deviations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    pub fn compute(closes: &[f64], period: usize, k: f64) -> Option<Self> {
        if period < 2 || closes.len() < period {
            return None;
        }
        let window = tail(closes, period);
        let middle = mean(window)?;
        let std = sample_std(window)?;
        Some(Self {
            upper: middle + k * std,
            middle,
            lower: middle - k * std,
        })
    }

    /// Where `price` sits between the bands (0 = lower, 1 = upper).
    pub fn position(&self, price: f64) -> f64 {
        (price - self.lower) / (self.upper - self.lower + EPSILON)
    }
}

/// Band-position rule on Bollinger(20, 2).
///
/// - position < 0.1: +12 bullish
/// - position > 0.9: -5 bearish
pub struct BollingerRule {
    period: usize,
    k: f64,
}

impl Default for BollingerRule {
    fn default() -> Self {
        Self { period: 20, k: 2.0 }
    }
}

impl TechnicalRule for BollingerRule {
    fn name(&self) -> &str {
        "Bollinger"
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<RuleHit> {
        let closes = closes(bars);
        let bands = BollingerBands::compute(&closes, self.period, self.k)?;
        let position = bands.position(*closes.last()?);

        if position < 0.1 {
            Some(RuleHit::new(
                12.0,
                Signal::bullish(self.name(), "Price near lower Bollinger Band"),
            ))
        } else if position > 0.9 {
            Some(RuleHit::new(
                -5.0,
                Signal::bearish(self.name(), "Price near upper Bollinger Band"),
            ))
        } else {
            None
        }
    }
}

//! MACD (Moving Average Convergence Divergence) indicator.

use super::{RuleHit, TechnicalRule};
use crate::types::{closes, Bar, Signal};

/// Exponential moving average seeded with the first value.
///
/// Uses smoothing factor 2 / (span + 1) from the very first element, without
/// any bias adjustment, so the output has the same length as the input.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            Some(p) => alpha * v + (1.0 - alpha) * p,
            None => v,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// MACD line, signal line and histogram, aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    pub fn compute(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> Self {
        let fast_ema = ema(closes, fast);
        let slow_ema = ema(closes, slow);
        let macd: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
        let signal = ema(&macd, signal_span);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
        Self {
            macd,
            signal,
            histogram,
        }
    }

    /// Standard 12/26/9 configuration.
    pub fn standard(closes: &[f64]) -> Self {
        Self::compute(closes, 12, 26, 9)
    }

    pub fn last_histogram(&self) -> Option<f64> {
        self.histogram.last().copied()
    }
}

/// Histogram crossover / momentum rule.
///
/// - histogram turns positive (previous <= 0): +15 bullish crossover
/// - otherwise, positive and rising: +8 bullish
pub struct MacdRule {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Default for MacdRule {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl TechnicalRule for MacdRule {
    fn name(&self) -> &str {
        "MACD"
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<RuleHit> {
        let series = MacdSeries::compute(&closes(bars), self.fast, self.slow, self.signal);
        let n = series.histogram.len();
        if n < 2 {
            return None;
        }
        let current = series.histogram[n - 1];
        let previous = series.histogram[n - 2];

        if current > 0.0 && previous <= 0.0 {
            Some(RuleHit::new(15.0, Signal::bullish(self.name(), "MACD bullish crossover")))
        } else if current > previous && current > 0.0 {
            Some(RuleHit::new(8.0, Signal::bullish(self.name(), "MACD momentum increasing")))
        } else {
            None
        }
    }
}

//! Relative Strength Index (RSI) indicator.

use super::{RuleHit, TechnicalRule};
use crate::types::{closes, Bar, Signal};

/// RSI over simple rolling means of gains and losses.
///
/// The first bar contributes a zero change, so a history of exactly `period`
/// bars is enough for a value. Returns None when the window has no losses
/// (the gain/loss ratio is undefined) or the history is too short.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let start = closes.len() - period;
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in start..closes.len() {
        if i == 0 {
            continue;
        }
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gain_sum += change;
        } else if change < 0.0 {
            loss_sum -= change;
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;
    if avg_loss == 0.0 {
        return None;
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Oversold/overbought rule on RSI(14).
///
/// - RSI < 30: +15 bullish
/// - 30 <= RSI < 40: +8 bullish
/// - RSI > 70: -10 bearish
pub struct RsiRule {
    period: usize,
}

impl Default for RsiRule {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl RsiRule {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl TechnicalRule for RsiRule {
    fn name(&self) -> &str {
        "RSI"
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<RuleHit> {
        let value = rsi(&closes(bars), self.period)?;

        if value < 30.0 {
            Some(RuleHit::new(
                15.0,
                Signal::bullish(self.name(), format!("RSI oversold at {:.1}", value)),
            ))
        } else if value < 40.0 {
            Some(RuleHit::new(
                8.0,
                Signal::bullish(self.name(), format!("RSI approaching oversold at {:.1}", value)),
            ))
        } else if value > 70.0 {
            Some(RuleHit::new(
                -10.0,
                Signal::bearish(self.name(), format!("RSI overbought at {:.1}", value)),
            ))
        } else {
            None
        }
    }
}

//! On-Balance Volume (OBV) indicator.

use super::{RuleHit, TechnicalRule};
use crate::types::{Bar, Signal};

/// Cumulative OBV, starting at 0 on the first bar.
///
/// - close > previous close: OBV += volume
/// - close < previous close: OBV -= volume
/// - unchanged: carried forward
pub fn obv(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut running = 0.0;
    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let prev = bars[i - 1].close;
            if bar.close > prev {
                running += bar.volume;
            } else if bar.close < prev {
                running -= bar.volume;
            }
        }
        out.push(running);
    }
    out
}

/// OBV trend rule: OBV now above OBV four bars earlier (the 5-bar window) scores +5.
pub struct ObvRule {
    window: usize,
}

impl Default for ObvRule {
    fn default() -> Self {
        Self { window: 5 }
    }
}

impl TechnicalRule for ObvRule {
    fn name(&self) -> &str {
        "OBV"
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<RuleHit> {
        let series = obv(bars);
        if series.len() < self.window {
            return None;
        }
        let trend = series[series.len() - 1] - series[series.len() - self.window];
        if trend > 0.0 {
            Some(RuleHit::new(5.0, Signal::bullish(self.name(), "OBV trending up")))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::test_support::{bars_from, bars_from_closes};

    #[test]
    fn test_obv_accumulates_by_direction() {
        let bars = bars_from(&[10.0, 11.0, 11.0, 10.5, 12.0], &[100.0, 200.0, 300.0, 400.0, 500.0]);
        assert_eq!(obv(&bars), vec![0.0, 200.0, 200.0, -200.0, 300.0]);
    }

    #[test]
    fn test_rule_fires_on_rising_obv() {
        let closes: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
        let hit = ObvRule::default().evaluate(&bars_from_closes(&closes)).unwrap();
        assert_eq!(hit.delta, 5.0);
    }

    #[test]
    fn test_rule_silent_on_flat_prices() {
        assert!(ObvRule::default().evaluate(&bars_from_closes(&[50.0; 30])).is_none());
    }
}

//! Price momentum indicator.

use super::{RuleHit, TechnicalRule};
use crate::types::{closes, Bar, Signal};

/// Percent change from the `offset`-th close counted from the end (1 = last).
///
/// `pct_change_from(closes, 5)` compares the last close with the close four
/// bars earlier. None when the history is shorter than `offset` or the base
/// price is not positive.
pub fn pct_change_from(closes: &[f64], offset: usize) -> Option<f64> {
    if offset == 0 || closes.len() < offset {
        return None;
    }
    let base = closes[closes.len() - offset];
    let last = *closes.last()?;
    if base <= 0.0 {
        return None;
    }
    Some((last / base - 1.0) * 100.0)
}

/// 5-day momentum rule: more than +5% scores +8 bullish.
pub struct MomentumRule {
    offset: usize,
    threshold_pct: f64,
}

impl Default for MomentumRule {
    fn default() -> Self {
        Self {
            offset: 5,
            threshold_pct: 5.0,
        }
    }
}

impl TechnicalRule for MomentumRule {
    fn name(&self) -> &str {
        "Momentum"
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<RuleHit> {
        let momentum = pct_change_from(&closes(bars), self.offset)?;
        if momentum > self.threshold_pct {
            Some(RuleHit::new(
                8.0,
                Signal::bullish(self.name(), format!("5-day momentum +{:.1}%", momentum)),
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::test_support::bars_from_closes;

    #[test]
    fn test_pct_change_offsets() {
        let closes = [100.0, 101.0, 102.0, 103.0, 104.0, 110.0];
        // closes[len - 5] = 101
        let change = pct_change_from(&closes, 5).unwrap();
        assert!((change - (110.0 / 101.0 - 1.0) * 100.0).abs() < 1e-12);
        assert!(pct_change_from(&closes, 7).is_none());
    }

    #[test]
    fn test_non_positive_base() {
        assert!(pct_change_from(&[0.0, 1.0, 2.0, 3.0, 4.0], 5).is_none());
    }

    #[test]
    fn test_rule_threshold() {
        let mut closes = vec![100.0; 30];
        closes[29] = 106.0;
        let hit = MomentumRule::default().evaluate(&bars_from_closes(&closes)).unwrap();
        assert_eq!(hit.delta, 8.0);
        assert_eq!(hit.signal.message, "5-day momentum +6.0%");

        closes[29] = 104.0;
        assert!(MomentumRule::default().evaluate(&bars_from_closes(&closes)).is_none());
    }
}

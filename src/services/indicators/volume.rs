//! Relative volume indicator.

use super::{mean, tail, RuleHit, TechnicalRule};
use crate::types::{volumes, Bar, Signal};

/// Last volume over the mean of the last `period` volumes.
///
/// Falls back to 1.0 when there are fewer than `period` bars or the mean is zero.
pub fn volume_ratio(volumes: &[f64], period: usize) -> f64 {
    if period == 0 || volumes.len() < period {
        return 1.0;
    }
    match (mean(tail(volumes, period)), volumes.last()) {
        (Some(avg), Some(&last)) if avg != 0.0 => last / avg,
        _ => 1.0,
    }
}

/// Volume spike rule on the 20-bar relative volume.
///
/// - ratio > 3.0: +15 bullish
/// - ratio > 2.0: +10 bullish
/// - ratio > 1.5: +5 neutral
pub struct VolumeRule {
    period: usize,
}

impl Default for VolumeRule {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl TechnicalRule for VolumeRule {
    fn name(&self) -> &str {
        "Volume"
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<RuleHit> {
        let ratio = volume_ratio(&volumes(bars), self.period);

        if ratio > 3.0 {
            Some(RuleHit::new(
                15.0,
                Signal::bullish(self.name(), format!("Volume surge {:.1}x average", ratio)),
            ))
        } else if ratio > 2.0 {
            Some(RuleHit::new(
                10.0,
                Signal::bullish(self.name(), format!("High volume {:.1}x average", ratio)),
            ))
        } else if ratio > 1.5 {
            Some(RuleHit::new(
                5.0,
                Signal::neutral(self.name(), format!("Above avg volume {:.1}x", ratio)),
            ))
        } else {
            None
        }
    }
}

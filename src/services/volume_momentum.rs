//! Secondary score built from volume trend and price momentum.

use crate::services::indicators::{mean, momentum::pct_change_from, tail};
use crate::types::{closes, volumes, Bar, ScoreStatus, VolumeMomentumScore};

/// Bars required for a computed score.
pub const MIN_VOLUME_BARS: usize = 20;

/// Score a history on a 0-100 scale starting from 50.
///
/// - 5-day / 20-day mean volume: > 2.0 +20, > 1.5 +12, > 1.2 +5
/// - with 10+ bars: 5-day momentum > 3% +10, 10-day momentum > 5% +8,
///   accelerating (5-day > half the 10-day and positive) +5
/// - with 50+ bars: last close in the top 20% of the high-low range of the
///   whole supplied history +8
pub fn volume_momentum_score(bars: &[Bar]) -> VolumeMomentumScore {
    if bars.len() < MIN_VOLUME_BARS {
        return VolumeMomentumScore::insufficient();
    }

    let closes = closes(bars);
    let volumes = volumes(bars);
    let mut score: f64 = 50.0;

    let vol_5 = mean(tail(&volumes, 5)).unwrap_or(0.0);
    let vol_20 = mean(tail(&volumes, 20)).unwrap_or(0.0);
    if vol_20 > 0.0 {
        let trend = vol_5 / vol_20;
        if trend > 2.0 {
            score += 20.0;
        } else if trend > 1.5 {
            score += 12.0;
        } else if trend > 1.2 {
            score += 5.0;
        }
    }

    if closes.len() >= 10 {
        if let (Some(mom_5), Some(mom_10)) = (pct_change_from(&closes, 5), pct_change_from(&closes, 10)) {
            if mom_5 > 3.0 {
                score += 10.0;
            }
            if mom_10 > 5.0 {
                score += 8.0;
            }
            if mom_5 > mom_10 / 2.0 && mom_5 > 0.0 {
                score += 5.0;
            }
        }
    }

    // Range position spans every supplied bar; callers pass about a year.
    if closes.len() >= 50 {
        let high = closes.iter().copied().fold(f64::MIN, f64::max);
        let low = closes.iter().copied().fold(f64::MAX, f64::min);
        let range = high - low;
        if range > 0.0 {
            if let Some(&last) = closes.last() {
                if (last - low) / range > 0.8 {
                    score += 8.0;
                }
            }
        }
    }

    VolumeMomentumScore {
        score: score.clamp(0.0, 100.0),
        status: ScoreStatus::Computed,
    }
}

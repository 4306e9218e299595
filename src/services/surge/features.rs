//! Classifier features and labels derived from a price history.

use crate::services::indicators::{
    mean, momentum::pct_change_from, rsi::rsi, sample_std, tail, volume::volume_ratio, MacdSeries,
};
use crate::types::{closes, volumes, Bar, FeatureVector, TrainingExample};

/// Bars required to extract features.
pub const MIN_FEATURE_BARS: usize = 30;
/// Bars ahead inspected for the surge label.
pub const LABEL_HORIZON: usize = 5;
/// Forward gain that counts as a surge.
pub const SURGE_THRESHOLD: f64 = 0.05;

/// Features of the most recent window, or None below 30 bars.
///
/// Undefined readings fall back to neutral values: RSI 50, MACD histogram 0,
/// ratios 1, returns and volatility 0.
pub fn extract_features(bars: &[Bar]) -> Option<FeatureVector> {
    if bars.len() < MIN_FEATURE_BARS {
        return None;
    }

    let closes = closes(bars);
    let volumes = volumes(bars);

    let rsi = rsi(&closes, 14).filter(|v| v.is_finite()).unwrap_or(50.0);
    let macd_histogram = MacdSeries::standard(&closes)
        .last_histogram()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);

    let vol_5 = mean(tail(&volumes, 5)).unwrap_or(0.0);
    let vol_20 = mean(tail(&volumes, 20)).unwrap_or(0.0);
    let volume_trend = if vol_20 > 0.0 { vol_5 / vol_20 } else { 1.0 };

    Some(FeatureVector {
        rsi,
        macd_histogram,
        volume_ratio: volume_ratio(&volumes, 20),
        return_5d_pct: pct_change_from(&closes, 5).unwrap_or(0.0),
        return_10d_pct: pct_change_from(&closes, 10).unwrap_or(0.0),
        volatility_20d_pct: volatility_pct(&closes, 20).unwrap_or(0.0),
        volume_trend,
    })
}

/// Sample standard deviation of the last `window` daily returns, in percent.
pub fn volatility_pct(closes: &[f64], window: usize) -> Option<f64> {
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect();
    sample_std(tail(&returns, window))
        .map(|std| std * 100.0)
        .filter(|v| v.is_finite())
}

/// True when the best close in `future` beats `current` by more than 5%.
pub fn surge_label(current: f64, future: &[Bar]) -> bool {
    if current <= 0.0 {
        return false;
    }
    let best = future.iter().map(|b| b.close).fold(f64::MIN, f64::max);
    best / current - 1.0 > SURGE_THRESHOLD
}

/// Labeled examples from every window `[..i]` with `i` in `30..len-5`.
pub fn labeled_examples(bars: &[Bar]) -> Vec<TrainingExample> {
    if bars.len() < MIN_FEATURE_BARS + LABEL_HORIZON + 1 {
        return Vec::new();
    }
    (MIN_FEATURE_BARS..bars.len() - LABEL_HORIZON)
        .filter_map(|i| {
            let window = &bars[..i];
            let features = extract_features(window)?;
            let current = window.last()?.close;
            Some(TrainingExample {
                features,
                surged: surge_label(current, &bars[i..i + LABEL_HORIZON]),
            })
        })
        .collect()
}

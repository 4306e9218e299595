//! Technical indicator math and the scoring rules built on it.
//!
//! Each indicator module exposes plain series functions plus one
//! [`TechnicalRule`] that turns the latest reading into a score adjustment.

pub mod bollinger;
pub mod macd;
pub mod momentum;
pub mod obv;
pub mod rsi;
pub mod volume;

pub use bollinger::{BollingerBands, BollingerRule};
pub use macd::{MacdRule, MacdSeries};
pub use momentum::MomentumRule;
pub use obv::ObvRule;
pub use rsi::RsiRule;
pub use volume::VolumeRule;

use crate::types::{Bar, Signal};

/// A score adjustment produced when a rule fires.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit {
    pub delta: f64,
    pub signal: Signal,
}

impl RuleHit {
    pub fn new(delta: f64, signal: Signal) -> Self {
        Self { delta, signal }
    }
}

/// Trait for indicator rules evaluated by the technical engine.
pub trait TechnicalRule: Send + Sync {
    /// Indicator name used on emitted signals.
    fn name(&self) -> &str;

    /// Evaluate against the full bar history.
    /// Returns None when the rule does not fire or its inputs are undefined.
    fn evaluate(&self, bars: &[Bar]) -> Option<RuleHit>;
}

/// Rules in evaluation order. Signal order in the output follows this list.
pub fn all_rules() -> Vec<Box<dyn TechnicalRule>> {
    vec![
        Box::new(RsiRule::default()),
        Box::new(MacdRule::default()),
        Box::new(BollingerRule::default()),
        Box::new(VolumeRule::default()),
        Box::new(ObvRule::default()),
        Box::new(MomentumRule::default()),
    ]
}

/// Arithmetic mean; None for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); None below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// The trailing `n` values (or all of them when shorter).
pub fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        let names: Vec<String> = all_rules().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["RSI", "MACD", "Bollinger", "Volume", "OBV", "Momentum"]);
    }

    #[test]
    fn test_sample_std() {
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.138_089_935).abs() < 1e-6);
        assert!(sample_std(&[1.0]).is_none());
    }

    #[test]
    fn test_tail_shorter_than_window() {
        assert_eq!(tail(&[1.0, 2.0], 5), &[1.0, 2.0]);
        assert_eq!(tail(&[1.0, 2.0, 3.0], 2), &[2.0, 3.0]);
    }
}

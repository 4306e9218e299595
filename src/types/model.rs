use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of classifier inputs.
pub const FEATURE_COUNT: usize = 7;

/// Column order of [`FeatureVector::to_array`].
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "rsi",
    "macd_histogram",
    "volume_ratio",
    "return_5d_pct",
    "return_10d_pct",
    "volatility_20d_pct",
    "volume_trend",
];

/// Classifier inputs derived from the most recent window of a history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub rsi: f64,
    pub macd_histogram: f64,
    pub volume_ratio: f64,
    pub return_5d_pct: f64,
    pub return_10d_pct: f64,
    pub volatility_20d_pct: f64,
    /// Mean 5-day volume over mean 20-day volume.
    pub volume_trend: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.rsi,
            self.macd_histogram,
            self.volume_ratio,
            self.return_5d_pct,
            self.return_10d_pct,
            self.volatility_20d_pct,
            self.volume_trend,
        ]
    }
}

/// One labeled row: did the close rise more than 5% within the next 5 bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: FeatureVector,
    pub surged: bool,
}

/// Result of a training request, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrainOutcome {
    Success {
        accuracy: f64,
        train_samples: usize,
        test_samples: usize,
        surge_ratio: f64,
    },
    Error {
        message: String,
    },
    AlreadyTraining {
        message: String,
    },
}

impl TrainOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TrainOutcome::Success { .. })
    }
}

/// Held-out evaluation of a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub accuracy: f64,
    pub train_samples: usize,
    pub test_samples: usize,
    pub surge_ratio: f64,
}

/// Public view of the active model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub trained: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TrainingStats>,
    pub training_in_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_outcome_tagging() {
        let json = serde_json::to_value(TrainOutcome::AlreadyTraining {
            message: "busy".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "already_training");

        let json = serde_json::to_value(TrainOutcome::Success {
            accuracy: 0.8,
            train_samples: 80,
            test_samples: 20,
            surge_ratio: 0.1,
        })
        .unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["train_samples"], 80);
    }

    #[test]
    fn test_feature_array_order_matches_names() {
        let fv = FeatureVector {
            rsi: 1.0,
            macd_histogram: 2.0,
            volume_ratio: 3.0,
            return_5d_pct: 4.0,
            return_10d_pct: 5.0,
            volatility_20d_pct: 6.0,
            volume_trend: 7.0,
        };
        assert_eq!(fv.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(FEATURE_NAMES[6], "volume_trend");
    }
}

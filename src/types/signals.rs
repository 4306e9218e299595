use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Direction a technical signal points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Bullish,
    Bearish,
    Neutral,
}

/// A discrete observation produced by the indicator engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    /// Indicator that fired ("RSI", "MACD", ...).
    pub indicator: String,
    pub message: String,
}

impl Signal {
    pub fn new(kind: SignalKind, indicator: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            indicator: indicator.to_string(),
            message: message.into(),
        }
    }

    pub fn bullish(indicator: &str, message: impl Into<String>) -> Self {
        Self::new(SignalKind::Bullish, indicator, message)
    }

    pub fn bearish(indicator: &str, message: impl Into<String>) -> Self {
        Self::new(SignalKind::Bearish, indicator, message)
    }

    pub fn neutral(indicator: &str, message: impl Into<String>) -> Self {
        Self::new(SignalKind::Neutral, indicator, message)
    }
}

/// How a reported score was obtained.
///
/// Sentinel values (0 for technicals, 50 elsewhere) are always paired with a
/// non-`Computed` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    Computed,
    InsufficientHistory,
    Unavailable,
    NoModel,
    Fallback,
}

impl ScoreStatus {
    pub fn is_computed(&self) -> bool {
        matches!(self, ScoreStatus::Computed)
    }
}

/// Latest indicator readings. `None` where the indicator is undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub current_price: Option<f64>,
}

/// Output of the indicator engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    /// 0-100, rounded to one decimal.
    pub score: f64,
    pub status: ScoreStatus,
    /// In evaluation order: RSI, MACD, Bollinger, Volume, OBV, Momentum.
    pub signals: Vec<Signal>,
    #[serde(default, serialize_with = "snapshot_or_empty", deserialize_with = "empty_as_none")]
    pub indicators: Option<IndicatorSnapshot>,
}

impl TechnicalAnalysis {
    /// Sentinel for histories too short to analyze.
    pub fn insufficient() -> Self {
        Self {
            score: 0.0,
            status: ScoreStatus::InsufficientHistory,
            signals: Vec::new(),
            indicators: None,
        }
    }
}

/// Output of the volume/momentum scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeMomentumScore {
    pub score: f64,
    pub status: ScoreStatus,
}

impl VolumeMomentumScore {
    pub fn insufficient() -> Self {
        Self {
            score: 50.0,
            status: ScoreStatus::InsufficientHistory,
        }
    }
}

/// Missing snapshots serialize as `{}`.
pub(crate) fn snapshot_or_empty<S: Serializer>(
    snapshot: &Option<IndicatorSnapshot>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;
    match snapshot {
        Some(s) => s.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Inverse of [`snapshot_or_empty`]: `{}` reads back as None.
pub(crate) fn empty_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<IndicatorSnapshot>, D::Error> {
    let snapshot = Option::<IndicatorSnapshot>::deserialize(deserializer)?;
    Ok(snapshot.filter(|s| *s != IndicatorSnapshot::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_serializes_type_field() {
        let signal = Signal::bullish("RSI", "RSI oversold at 25.0");
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["type"], "bullish");
        assert_eq!(json["indicator"], "RSI");
    }

    #[test]
    fn test_insufficient_analysis_serializes_empty_indicators() {
        let json = serde_json::to_value(TechnicalAnalysis::insufficient()).unwrap();
        assert_eq!(json["score"], 0.0);
        assert_eq!(json["status"], "insufficient_history");
        assert_eq!(json["indicators"], serde_json::json!({}));
        assert_eq!(json["signals"], serde_json::json!([]));
    }

    #[test]
    fn test_undefined_rsi_serializes_null() {
        let analysis = TechnicalAnalysis {
            score: 50.0,
            status: ScoreStatus::Computed,
            signals: vec![],
            indicators: Some(IndicatorSnapshot {
                rsi: None,
                macd_histogram: Some(0.0),
                volume_ratio: Some(1.0),
                current_price: Some(10.0),
            }),
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json["indicators"]["rsi"].is_null());
        assert_eq!(json["indicators"]["volume_ratio"], 1.0);
    }

    #[test]
    fn test_missing_snapshot_reads_back_as_none() {
        let json = serde_json::to_string(&TechnicalAnalysis::insufficient()).unwrap();
        let restored: TechnicalAnalysis = serde_json::from_str(&json).unwrap();
        assert!(restored.indicators.is_none());
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Daily bars in ascending date order with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    bars: Vec<Bar>,
}

impl PriceHistory {
    /// Build a history from bars in any order.
    ///
    /// Bars are sorted by date; when a date repeats, the later bar wins.
    pub fn new(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self { bars: deduped }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Compact close/volume points for the most recent `n` bars.
    pub fn tail_points(&self, n: usize) -> Vec<PricePoint> {
        let start = self.bars.len().saturating_sub(n);
        self.bars[start..].iter().map(PricePoint::from).collect()
    }
}

/// Compact chart point attached to score results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// ISO date (YYYY-MM-DD).
    pub date: String,
    pub close: f64,
    pub volume: u64,
}

impl From<&Bar> for PricePoint {
    fn from(bar: &Bar) -> Self {
        Self {
            date: bar.date.format("%Y-%m-%d").to_string(),
            close: super::round_to(bar.close, 2),
            volume: bar.volume.max(0.0) as u64,
        }
    }
}

/// Lookback window requested from the market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPeriod {
    /// Scoring window.
    ThreeMonths,
    /// Classifier training window.
    OneYear,
}

impl HistoryPeriod {
    /// Range string understood by the chart API.
    pub fn range(&self) -> &'static str {
        match self {
            HistoryPeriod::ThreeMonths => "3mo",
            HistoryPeriod::OneYear => "1y",
        }
    }
}

/// Closing prices of a bar slice.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Volumes of a bar slice.
pub fn volumes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
        }
    }

    #[test]
    fn test_history_sorts_and_dedups() {
        let history = PriceHistory::new(vec![bar(3, 3.0), bar(1, 1.0), bar(3, 3.5), bar(2, 2.0)]);
        let closes: Vec<f64> = history.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.5]);
    }

    #[test]
    fn test_tail_points_limits_and_formats() {
        let history = PriceHistory::new((1..=10).map(|d| bar(d, d as f64 + 0.123)).collect());
        let points = history.tail_points(3);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].date, "2024-03-08");
        assert_eq!(points[2].close, 10.12);
        assert_eq!(points[2].volume, 1_000);
    }

    #[test]
    fn test_tail_points_short_history() {
        let history = PriceHistory::new(vec![bar(1, 5.0)]);
        assert_eq!(history.tail_points(30).len(), 1);
    }

    #[test]
    fn test_period_range() {
        assert_eq!(HistoryPeriod::ThreeMonths.range(), "3mo");
        assert_eq!(HistoryPeriod::OneYear.range(), "1y");
    }
}

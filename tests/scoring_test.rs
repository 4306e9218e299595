//! Composite scoring against in-process market data.

mod common;

use common::{info, rising_bars, wavy_bars, MockMarket};
use std::sync::Arc;
use surge_radar::error::AppError;
use surge_radar::services::scorer::weighted_total;
use surge_radar::services::ModelRegistry;
use surge_radar::types::ScoreStatus;

#[tokio::test]
async fn test_score_one_populates_every_field() {
    let market = Arc::new(
        MockMarket::new()
            .with_history("ACME", wavy_bars(120, 0.3))
            .with_metadata(info("ACME", 123.456)),
    );
    let engine = common::engine(market, Arc::new(ModelRegistry::in_memory()), 4);

    let result = engine.score_one("acme").await.unwrap();
    assert_eq!(result.ticker, "ACME");
    assert_eq!(result.name, "ACME Inc.");
    assert_eq!(result.sector, "Technology");
    assert_eq!(result.current_price, 123.46);
    assert_eq!(result.technical_status, ScoreStatus::Computed);
    assert_eq!(result.volume_status, ScoreStatus::Computed);
    assert_eq!(result.sentiment_score, 50.0);
    assert_eq!(result.ml_surge_probability, 50.0);
    assert_eq!(result.ml_status, ScoreStatus::NoModel);
    assert_eq!(result.price_history.len(), 30);
    assert!(result.indicators.is_some());

    for score in [result.total_score, result.technical_score, result.volume_score] {
        assert!((0.0..=100.0).contains(&score));
    }
    let expected = weighted_total(result.technical_score, result.sentiment_score, result.volume_score);
    assert!((result.total_score - expected).abs() < 0.051);
}

#[tokio::test]
async fn test_missing_metadata_uses_defaults_and_last_close() {
    let bars = rising_bars(90);
    let last_close = bars.last().unwrap().close;
    let market = Arc::new(MockMarket::new().with_history("RISE", bars));
    let engine = common::engine(market, Arc::new(ModelRegistry::in_memory()), 4);

    let result = engine.score_one("RISE").await.unwrap();
    assert_eq!(result.name, "RISE");
    assert_eq!(result.sector, "N/A");
    assert_eq!(result.current_price, last_close);
}

#[tokio::test]
async fn test_missing_history_fails_the_ticker() {
    let market = Arc::new(MockMarket::new().with_metadata(info("GONE", 5.0)));
    let engine = common::engine(market, Arc::new(ModelRegistry::in_memory()), 4);

    let err = engine.score_one("GONE").await.unwrap_err();
    assert!(matches!(err, AppError::DataUnavailable { ref ticker, .. } if ticker == "GONE"));
}

#[tokio::test]
async fn test_short_history_reports_sentinels() {
    let market = Arc::new(MockMarket::new().with_history("TINY", rising_bars(15)));
    let engine = common::engine(market, Arc::new(ModelRegistry::in_memory()), 4);

    let result = engine.score_one("TINY").await.unwrap();
    assert_eq!(result.technical_score, 0.0);
    assert_eq!(result.technical_status, ScoreStatus::InsufficientHistory);
    assert_eq!(result.volume_score, 50.0);
    assert_eq!(result.volume_status, ScoreStatus::InsufficientHistory);
    assert!(result.signals.is_empty());
    assert_eq!(result.total_score, 30.0);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["indicators"], serde_json::json!({}));
    assert_eq!(json["technical_status"], "insufficient_history");
}

#[tokio::test]
async fn test_scoring_is_deterministic() {
    let market = Arc::new(MockMarket::new().with_history("SAME", wavy_bars(100, 1.1)));
    let engine = common::engine(market, Arc::new(ModelRegistry::in_memory()), 4);

    let first = engine.score_one("SAME").await.unwrap();
    let second = engine.score_one("SAME").await.unwrap();
    assert_eq!(first, second);
}

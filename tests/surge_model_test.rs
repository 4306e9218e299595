//! Surge classifier lifecycle: training, inference, persistence.

mod common;

use common::{temp_path, wavy_bars, MockMarket};
use std::sync::Arc;
use surge_radar::services::ModelRegistry;
use surge_radar::types::{ScoreStatus, TrainOutcome};
use tokio::sync::Notify;

fn training_market() -> MockMarket {
    MockMarket::new()
        .with_history("AAA", wavy_bars(250, 0.0))
        .with_history("BBB", wavy_bars(250, 2.0))
}

fn names(tickers: &[&str]) -> Option<Vec<String>> {
    Some(tickers.iter().map(|t| t.to_string()).collect())
}

#[tokio::test]
async fn test_untrained_model_is_neutral() {
    let engine = common::engine(Arc::new(training_market()), Arc::new(ModelRegistry::in_memory()), 4);

    assert!(!engine.is_model_trained());
    let estimate = engine.predict_surge("AAA").await;
    assert_eq!(estimate.probability, 50.0);
    assert_eq!(estimate.status, ScoreStatus::NoModel);

    let info = engine.model_info();
    assert!(!info.trained);
    assert!(info.trained_at.is_none());
    assert!(!info.training_in_progress);
}

#[tokio::test]
async fn test_insufficient_examples_is_an_error_outcome() {
    // 70 bars yield 35 labeled rows; 50-bar histories are skipped outright
    let market = MockMarket::new()
        .with_history("SHORT", wavy_bars(70, 0.0))
        .with_history("TINY", wavy_bars(50, 0.0));
    let engine = common::engine(Arc::new(market), Arc::new(ModelRegistry::in_memory()), 4);

    let outcome = engine.train_classifier(names(&["SHORT", "TINY", "MISSING"])).await;
    match outcome {
        TrainOutcome::Error { message } => assert!(message.contains("Insufficient training data: 35")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!engine.is_model_trained());
}

#[tokio::test]
async fn test_training_installs_a_model() {
    let engine = common::engine(Arc::new(training_market()), Arc::new(ModelRegistry::in_memory()), 4);

    let outcome = engine.train_classifier(names(&["AAA", "BBB"])).await;
    let TrainOutcome::Success {
        accuracy,
        train_samples,
        test_samples,
        surge_ratio,
    } = outcome
    else {
        panic!("training failed: {:?}", outcome);
    };
    // 2 x (250 - 35) rows split 80/20
    assert_eq!(train_samples + test_samples, 430);
    assert_eq!(test_samples, 86);
    assert!((0.0..=1.0).contains(&accuracy));
    assert!(surge_ratio > 0.0 && surge_ratio < 1.0);

    assert!(engine.is_model_trained());
    let info = engine.model_info();
    assert!(info.trained_at.is_some());
    assert_eq!(info.stats.map(|s| s.test_samples), Some(86));

    let estimate = engine.predict_surge("aaa").await;
    assert_eq!(estimate.status, ScoreStatus::Computed);
    assert!((0.0..=100.0).contains(&estimate.probability));

    let result = engine.score_one("BBB").await.unwrap();
    assert_eq!(result.ml_status, ScoreStatus::Computed);

    let missing = engine.predict_surge("NOPE").await;
    assert_eq!(missing.status, ScoreStatus::Unavailable);
    assert_eq!(missing.probability, 50.0);
}

#[tokio::test]
async fn test_concurrent_training_is_rejected() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let market = training_market().gated(entered.clone(), release.clone());
    let engine = common::engine(Arc::new(market), Arc::new(ModelRegistry::in_memory()), 4);

    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.train_classifier(names(&["AAA"])).await })
    };

    entered.notified().await;
    assert!(engine.model_info().training_in_progress);

    let second = engine.train_classifier(names(&["AAA"])).await;
    assert!(matches!(second, TrainOutcome::AlreadyTraining { .. }));

    release.notify_waiters();
    let first = first.await.unwrap();
    assert!(first.is_success(), "first run failed: {:?}", first);
    assert!(!engine.model_info().training_in_progress);
}

#[tokio::test]
async fn test_model_survives_restart() {
    let path = temp_path("model.json");

    let registry = Arc::new(ModelRegistry::open(&path));
    assert!(!registry.is_trained());
    let engine = common::engine(Arc::new(training_market()), registry, 4);
    assert!(engine.train_classifier(names(&["AAA", "BBB"])).await.is_success());
    assert!(path.exists());
    let before = engine.predict_surge("AAA").await;

    // A fresh process loads the artifact and answers identically
    let reopened = Arc::new(ModelRegistry::open(&path));
    assert!(reopened.is_trained());
    let restarted = common::engine(Arc::new(training_market()), reopened, 4);
    let after = restarted.predict_surge("AAA").await;
    assert_eq!(before, after);

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_corrupt_artifact_is_ignored() {
    let path = temp_path("corrupt.json");
    std::fs::write(&path, b"{not json").unwrap();

    let registry = ModelRegistry::open(&path);
    assert!(!registry.is_trained());

    std::fs::remove_file(&path).unwrap();
}

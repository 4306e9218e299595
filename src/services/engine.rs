//! Entry point to the scoring core used by the scan service and the API.

use super::orchestrator;
use super::scorer::CompositeScorer;
use super::sentiment::SentimentAggregator;
use super::surge::{ForestParams, ModelRegistry, SurgePredictor};
use crate::error::Result;
use crate::sources::MarketDataProvider;
use crate::types::{BatchReport, ModelInfo, ScoreResult, SentimentDetail, SurgeEstimate, TrainOutcome};
use std::sync::Arc;

/// Cheap to clone; all parts are shared.
#[derive(Clone)]
pub struct SurgeEngine {
    scorer: Arc<CompositeScorer>,
    sentiment: Arc<SentimentAggregator>,
    predictor: Arc<SurgePredictor>,
    max_workers: usize,
}

impl SurgeEngine {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        sentiment: Arc<SentimentAggregator>,
        registry: Arc<ModelRegistry>,
        max_workers: usize,
    ) -> Self {
        Self::with_forest_params(market, sentiment, registry, max_workers, ForestParams::default())
    }

    pub fn with_forest_params(
        market: Arc<dyn MarketDataProvider>,
        sentiment: Arc<SentimentAggregator>,
        registry: Arc<ModelRegistry>,
        max_workers: usize,
        params: ForestParams,
    ) -> Self {
        Self {
            scorer: Arc::new(CompositeScorer::new(market.clone(), sentiment.clone())),
            sentiment,
            predictor: Arc::new(SurgePredictor::with_params(market, registry, params)),
            max_workers,
        }
    }

    /// Full result for one ticker, including the surge estimate.
    pub async fn score_one(&self, ticker: &str) -> Result<ScoreResult> {
        let result = self.scorer.score(ticker).await?;
        let estimate = self.predictor.predict_surge(&result.ticker).await;
        Ok(result.with_surge(estimate))
    }

    /// Score `tickers` with up to `workers` concurrent tasks.
    pub async fn score_batch(&self, tickers: &[String], workers: usize) -> BatchReport {
        let engine = self.clone();
        orchestrator::score_batch(tickers, workers, self.max_workers, move |ticker| {
            let engine = engine.clone();
            async move { engine.score_one(&ticker).await }
        })
        .await
    }

    pub async fn get_sentiment(&self, ticker: &str) -> SentimentDetail {
        self.sentiment.analyze(&ticker.trim().to_uppercase()).await
    }

    pub async fn train_classifier(&self, tickers: Option<Vec<String>>) -> TrainOutcome {
        self.predictor.train(tickers).await
    }

    pub async fn predict_surge(&self, ticker: &str) -> SurgeEstimate {
        self.predictor.predict_surge(&ticker.trim().to_uppercase()).await
    }

    pub fn is_model_trained(&self) -> bool {
        self.predictor.registry().is_trained()
    }

    pub fn model_info(&self) -> ModelInfo {
        self.predictor.registry().info()
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }
}

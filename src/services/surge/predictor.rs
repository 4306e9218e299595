//! Surge classifier training and inference.

use super::features::{extract_features, labeled_examples};
use super::forest::{ForestParams, RandomForest};
use super::registry::{ModelRegistry, SurgeModel};
use crate::error::TrainingError;
use crate::sources::MarketDataProvider;
use crate::types::{round_to, Bar, HistoryPeriod, ScoreStatus, SurgeEstimate, TrainOutcome, TrainingExample, TrainingStats};
use futures_util::future::join_all;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Tickers used when a training request names none.
pub const DEFAULT_TRAINING_TICKERS: [&str; 10] =
    ["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "AMD", "META", "NFLX", "PLTR"];

/// Examples required before a model is fitted.
pub const MIN_TRAINING_EXAMPLES: usize = 50;
/// Shorter histories are skipped when building the dataset.
pub const MIN_TRAINING_BARS: usize = 60;
const TEST_FRACTION: f64 = 0.2;

/// Trains the surge classifier and serves probabilities from the registry.
pub struct SurgePredictor {
    market: Arc<dyn MarketDataProvider>,
    registry: Arc<ModelRegistry>,
    params: ForestParams,
}

impl SurgePredictor {
    pub fn new(market: Arc<dyn MarketDataProvider>, registry: Arc<ModelRegistry>) -> Self {
        Self::with_params(market, registry, ForestParams::default())
    }

    pub fn with_params(market: Arc<dyn MarketDataProvider>, registry: Arc<ModelRegistry>, params: ForestParams) -> Self {
        Self {
            market,
            registry,
            params,
        }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Labeled examples from one year of history per ticker. Failed or short
    /// histories are skipped.
    pub async fn build_training_data(&self, tickers: &[String]) -> Vec<TrainingExample> {
        let fetches = tickers
            .iter()
            .map(|ticker| self.market.fetch_history(ticker, HistoryPeriod::OneYear));
        let histories = join_all(fetches).await;

        let mut examples = Vec::new();
        for (ticker, history) in tickers.iter().zip(histories) {
            match history {
                Ok(history) if history.len() >= MIN_TRAINING_BARS => {
                    let rows = labeled_examples(history.bars());
                    debug!("{}: {} training examples", ticker, rows.len());
                    examples.extend(rows);
                }
                Ok(history) => debug!("Skipping {}: only {} bars", ticker, history.len()),
                Err(e) => debug!("Skipping {}: {}", ticker, e),
            }
        }
        examples
    }

    /// Train on `tickers` (or the default list) and install the model on success.
    ///
    /// Never fails: every outcome is reported through the returned status.
    pub async fn train(&self, tickers: Option<Vec<String>>) -> TrainOutcome {
        let _guard = match self.registry.try_begin_training() {
            Ok(guard) => guard,
            Err(e) => {
                return TrainOutcome::AlreadyTraining { message: e.to_string() };
            }
        };

        let tickers = tickers
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TRAINING_TICKERS.iter().map(|t| t.to_string()).collect());

        let start = Instant::now();
        match self.run_training(&tickers).await {
            Ok(stats) => {
                info!(
                    "Trained surge model on {} tickers in {:.1}s: accuracy {}, {} train / {} test",
                    tickers.len(),
                    start.elapsed().as_secs_f64(),
                    stats.accuracy,
                    stats.train_samples,
                    stats.test_samples
                );
                TrainOutcome::Success {
                    accuracy: stats.accuracy,
                    train_samples: stats.train_samples,
                    test_samples: stats.test_samples,
                    surge_ratio: stats.surge_ratio,
                }
            }
            Err(e) => {
                warn!("Surge model training failed: {}", e);
                TrainOutcome::Error { message: e.to_string() }
            }
        }
    }

    async fn run_training(&self, tickers: &[String]) -> Result<TrainingStats, TrainingError> {
        let examples = self.build_training_data(tickers).await;
        if examples.len() < MIN_TRAINING_EXAMPLES {
            return Err(TrainingError::InsufficientTrainingData {
                samples: examples.len(),
                required: MIN_TRAINING_EXAMPLES,
            });
        }

        let params = self.params;
        let model = tokio::task::spawn_blocking(move || fit_model(&examples, params))
            .await
            .map_err(|e| TrainingError::Fitting(e.to_string()))?;

        let stats = model.stats;
        self.registry.install(model)?;
        Ok(stats)
    }

    /// Surge probability for `ticker` from its recent history.
    pub async fn predict_surge(&self, ticker: &str) -> SurgeEstimate {
        if !self.registry.is_trained() {
            return SurgeEstimate::neutral(ScoreStatus::NoModel);
        }
        match self.market.fetch_history(ticker, HistoryPeriod::ThreeMonths).await {
            Ok(history) => self.estimate(history.bars()),
            Err(e) => {
                debug!("No history for surge estimate of {}: {}", ticker, e);
                SurgeEstimate::neutral(ScoreStatus::Unavailable)
            }
        }
    }

    /// Surge probability for an already fetched history.
    pub fn estimate(&self, bars: &[Bar]) -> SurgeEstimate {
        let Some(model) = self.registry.current() else {
            return SurgeEstimate::neutral(ScoreStatus::NoModel);
        };
        let Some(features) = extract_features(bars) else {
            return SurgeEstimate::neutral(ScoreStatus::InsufficientHistory);
        };
        match model.probability(&features) {
            Ok(p) => SurgeEstimate::computed(p * 100.0),
            Err(e) => {
                warn!("Surge inference failed, using neutral fallback: {}", e);
                SurgeEstimate::neutral(ScoreStatus::Fallback)
            }
        }
    }
}

/// Shuffled 80/20 split, forest fit and held-out accuracy.
pub fn fit_model(examples: &[TrainingExample], params: ForestParams) -> SurgeModel {
    let mut order: Vec<usize> = (0..examples.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(params.seed));

    let test_len = (examples.len() as f64 * TEST_FRACTION).ceil() as usize;
    let (test_idx, train_idx) = order.split_at(test_len.min(order.len()));

    let rows = |idx: &[usize]| -> Vec<Vec<f64>> {
        idx.iter()
            .map(|&i| examples[i].features.to_array().to_vec())
            .collect()
    };
    let labels = |idx: &[usize]| -> Vec<bool> { idx.iter().map(|&i| examples[i].surged).collect() };

    let train_labels = labels(train_idx);
    let forest = RandomForest::fit(&rows(train_idx), &train_labels, &params);

    // A single-class training set predicts that class.
    let majority = train_labels.iter().filter(|&&l| l).count() * 2 > train_labels.len();
    let test_rows = rows(test_idx);
    let test_labels = labels(test_idx);
    let correct = test_rows
        .iter()
        .zip(&test_labels)
        .filter(|(row, label)| forest.predict(row).unwrap_or(majority) == **label)
        .count();
    let accuracy = if test_rows.is_empty() {
        0.0
    } else {
        correct as f64 / test_rows.len() as f64
    };

    let surged = examples.iter().filter(|e| e.surged).count();
    let surge_ratio = if examples.is_empty() {
        0.0
    } else {
        surged as f64 / examples.len() as f64
    };

    let stats = TrainingStats {
        accuracy: round_to(accuracy, 3),
        train_samples: train_idx.len(),
        test_samples: test_idx.len(),
        surge_ratio: round_to(surge_ratio, 3),
    };
    SurgeModel::new(forest, params, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureVector;

    fn example(x: f64, surged: bool) -> TrainingExample {
        TrainingExample {
            features: FeatureVector {
                rsi: x,
                macd_histogram: x / 10.0,
                volume_ratio: 1.0,
                return_5d_pct: x / 5.0,
                return_10d_pct: 0.0,
                volatility_20d_pct: 1.0,
                volume_trend: 1.0,
            },
            surged,
        }
    }

    fn params() -> ForestParams {
        ForestParams {
            n_trees: 20,
            ..ForestParams::default()
        }
    }

    #[test]
    fn test_fit_model_split_sizes() {
        let examples: Vec<TrainingExample> = (0..101).map(|i| example(i as f64, i > 60)).collect();
        let model = fit_model(&examples, params());
        assert_eq!(model.stats.test_samples, 21);
        assert_eq!(model.stats.train_samples, 80);
        assert_eq!(model.stats.surge_ratio, round_to(40.0 / 101.0, 3));
        assert!(model.stats.accuracy >= 0.8);
    }

    #[test]
    fn test_fit_model_is_reproducible() {
        let examples: Vec<TrainingExample> = (0..80).map(|i| example((i * 7 % 80) as f64, i % 3 == 0)).collect();
        let a = fit_model(&examples, params());
        let b = fit_model(&examples, params());
        assert_eq!(a.forest, b.forest);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_single_class_model_falls_back() {
        let examples: Vec<TrainingExample> = (0..60).map(|i| example(i as f64, false)).collect();
        let model = fit_model(&examples, params());
        assert_eq!(model.stats.accuracy, 1.0);
        assert!(model.probability(&examples[0].features).is_err());
    }
}

//! Surge classifier: features, forest, model registry and predictor.

pub mod features;
pub mod forest;
pub mod predictor;
pub mod registry;

pub use features::extract_features;
pub use forest::{ForestParams, RandomForest};
pub use predictor::{SurgePredictor, DEFAULT_TRAINING_TICKERS, MIN_TRAINING_EXAMPLES};
pub use registry::{ModelRegistry, SurgeModel};

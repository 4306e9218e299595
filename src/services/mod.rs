pub mod cache;
pub mod engine;
pub mod indicators;
pub mod market_data;
pub mod orchestrator;
pub mod scan;
pub mod scorer;
pub mod sentiment;
pub mod sqlite_store;
pub mod surge;
pub mod technical;
pub mod volume_momentum;

pub use cache::TtlCache;
pub use engine::SurgeEngine;
pub use market_data::CachedMarketData;
pub use scan::{ScanInfo, ScanService, ScanSnapshot};
pub use scorer::CompositeScorer;
pub use sentiment::{PolarityAnalyzer, SentimentAggregator};
pub use sqlite_store::{SqliteStore, StoredPrediction};
pub use surge::{ModelRegistry, SurgePredictor};
pub use technical::TechnicalEngine;
pub use volume_momentum::volume_momentum_score;

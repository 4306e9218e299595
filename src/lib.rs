//! Surge Radar - surge likelihood scoring for US equities

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::{ScanService, SurgeEngine};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: SurgeEngine,
    pub scan: Arc<ScanService>,
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::*;

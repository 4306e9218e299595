//! Single-slot holder for the active surge model.
//!
//! Readers clone an `Arc` out of the slot and never see a partially built
//! model. Installing writes the artifact to a sibling temp file, renames it
//! over the target and only then swaps the in-memory handle. Training runs
//! are serialized through a non-queuing lock.

use super::forest::{ForestParams, RandomForest};
use crate::error::{InferenceError, TrainingError};
use crate::types::{FeatureVector, ModelInfo, TrainingStats, FEATURE_NAMES};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

/// Serialized classifier plus its training metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurgeModel {
    pub forest: RandomForest,
    pub feature_names: Vec<String>,
    pub params: ForestParams,
    pub trained_at: DateTime<Utc>,
    pub stats: TrainingStats,
}

impl SurgeModel {
    pub fn new(forest: RandomForest, params: ForestParams, stats: TrainingStats) -> Self {
        Self {
            forest,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            params,
            trained_at: Utc::now(),
            stats,
        }
    }

    /// Surge probability in [0, 1].
    pub fn probability(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        self.forest.predict_proba(&features.to_array())
    }
}

/// Owns the active model slot and the training lock.
pub struct ModelRegistry {
    active: RwLock<Option<Arc<SurgeModel>>>,
    training: Mutex<()>,
    artifact_path: Option<PathBuf>,
}

impl ModelRegistry {
    /// Registry without a durable artifact.
    pub fn in_memory() -> Self {
        Self {
            active: RwLock::new(None),
            training: Mutex::new(()),
            artifact_path: None,
        }
    }

    /// Registry backed by `path`, loading the artifact when one exists.
    /// An unreadable artifact is logged and ignored.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let model = match load_artifact(&path) {
            Ok(Some(model)) => {
                info!("Loaded surge model from {} (trained {})", path.display(), model.trained_at);
                Some(Arc::new(model))
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable model at {}: {}", path.display(), e);
                None
            }
        };

        Self {
            active: RwLock::new(model),
            training: Mutex::new(()),
            artifact_path: Some(path),
        }
    }

    /// The active model, if any.
    pub fn current(&self) -> Option<Arc<SurgeModel>> {
        match self.active.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.current().is_some()
    }

    pub fn is_training(&self) -> bool {
        self.training.try_lock().is_err()
    }

    /// Claim the training slot. Fails immediately if a run is in flight.
    pub fn try_begin_training(&self) -> Result<MutexGuard<'_, ()>, TrainingError> {
        self.training.try_lock().map_err(|_| TrainingError::AlreadyTraining)
    }

    /// Persist `model` (when backed by a file) and make it the active model.
    /// The previous model stays active if persisting fails.
    pub fn install(&self, model: SurgeModel) -> Result<(), TrainingError> {
        if let Some(path) = &self.artifact_path {
            write_artifact(path, &model).map_err(|e| TrainingError::Persist(e.to_string()))?;
        }

        let model = Arc::new(model);
        match self.active.write() {
            Ok(mut guard) => *guard = Some(model),
            Err(poisoned) => *poisoned.into_inner() = Some(model),
        }
        Ok(())
    }

    pub fn info(&self) -> ModelInfo {
        let model = self.current();
        ModelInfo {
            trained: model.is_some(),
            trained_at: model.as_ref().map(|m| m.trained_at),
            stats: model.as_ref().map(|m| m.stats),
            training_in_progress: self.is_training(),
        }
    }

    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact_path.as_deref()
    }
}

fn load_artifact(path: &Path) -> anyhow::Result<Option<SurgeModel>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

fn write_artifact(path: &Path, model: &SurgeModel) -> anyhow::Result<()> {
    let json = serde_json::to_string(model)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_model() -> SurgeModel {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64; 7]).collect();
        let labels: Vec<bool> = (0..20).map(|i| i >= 10).collect();
        let params = ForestParams {
            n_trees: 3,
            ..ForestParams::default()
        };
        let stats = TrainingStats {
            accuracy: 1.0,
            train_samples: 16,
            test_samples: 4,
            surge_ratio: 0.5,
        };
        SurgeModel::new(RandomForest::fit(&rows, &labels, &params), params, stats)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("surge_radar_{}_{}.json", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_in_memory_starts_untrained() {
        let registry = ModelRegistry::in_memory();
        assert!(!registry.is_trained());
        assert!(registry.current().is_none());
        let info = registry.info();
        assert!(!info.trained);
        assert!(info.trained_at.is_none());
    }

    #[test]
    fn test_install_swaps_model() {
        let registry = ModelRegistry::in_memory();
        registry.install(tiny_model()).unwrap();
        assert!(registry.is_trained());
        assert_eq!(registry.info().stats.unwrap().train_samples, 16);
    }

    #[test]
    fn test_artifact_reloads() {
        let path = temp_path("reload");
        let registry = ModelRegistry::open(&path);
        assert!(!registry.is_trained());
        registry.install(tiny_model()).unwrap();
        assert!(path.exists());

        let reopened = ModelRegistry::open(&path);
        assert_eq!(reopened.current().unwrap().as_ref(), registry.current().unwrap().as_ref());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_artifact_is_ignored() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();
        let registry = ModelRegistry::open(&path);
        assert!(!registry.is_trained());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_persist_keeps_previous_model() {
        let dir = std::env::temp_dir().join(format!("surge_radar_dir_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        // Renaming a file over a directory fails.
        let registry = ModelRegistry::open(&dir);
        assert!(registry.install(tiny_model()).is_err());
        assert!(!registry.is_trained());
        let _ = fs::remove_dir_all(&dir);
        let _ = fs::remove_file(dir.with_extension("tmp"));
    }

    #[tokio::test]
    async fn test_second_training_claim_fails_fast() {
        let registry = ModelRegistry::in_memory();
        let guard = registry.try_begin_training().unwrap();
        assert!(registry.is_training());
        assert_eq!(registry.try_begin_training().err(), Some(TrainingError::AlreadyTraining));
        drop(guard);
        assert!(!registry.is_training());
        assert!(registry.try_begin_training().is_ok());
    }
}

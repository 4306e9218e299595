//! Candidate scans: list, score, persist, publish.

use super::engine::SurgeEngine;
use super::sqlite_store::{SqliteStore, StoredPrediction};
use crate::sources::{CandidateGroup, CandidateService};
use crate::types::{round_to, BatchReport, ScoreResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of one refresh, as published to readers.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSnapshot {
    pub run_id: String,
    pub group: CandidateGroup,
    pub refreshed_at: DateTime<Utc>,
    /// Candidates listed before the `max_stocks` cap.
    pub total_candidates: usize,
    pub sources: BTreeMap<String, usize>,
    pub report: BatchReport,
}

impl ScanSnapshot {
    /// Results with `total_score >= min_score`, best first, at most `limit`.
    pub fn filtered(&self, min_score: f64, limit: usize) -> Vec<&ScoreResult> {
        self.report
            .results
            .iter()
            .filter(|r| r.total_score >= min_score)
            .take(limit)
            .collect()
    }

    /// Summary without the per-ticker payloads.
    pub fn info(&self) -> ScanInfo {
        ScanInfo {
            run_id: self.run_id.clone(),
            group: self.group,
            refreshed_at: self.refreshed_at,
            total_candidates: self.total_candidates,
            analyzed: self.report.results.len(),
            failed: self.report.failed.len(),
            failed_tickers: self.report.failed.clone(),
            elapsed_seconds: round_to(self.report.elapsed_seconds, 1),
            sources: self.sources.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanInfo {
    pub run_id: String,
    pub group: CandidateGroup,
    pub refreshed_at: DateTime<Utc>,
    pub total_candidates: usize,
    pub analyzed: usize,
    pub failed: usize,
    pub failed_tickers: Vec<String>,
    pub elapsed_seconds: f64,
    pub sources: BTreeMap<String, usize>,
}

/// Owns the most recent scan and runs new ones.
pub struct ScanService {
    engine: SurgeEngine,
    candidates: Arc<CandidateService>,
    store: Option<Arc<SqliteStore>>,
    latest: RwLock<Option<Arc<ScanSnapshot>>>,
    default_workers: usize,
}

impl ScanService {
    pub fn new(
        engine: SurgeEngine,
        candidates: Arc<CandidateService>,
        store: Option<Arc<SqliteStore>>,
        default_workers: usize,
    ) -> Self {
        Self {
            engine,
            candidates,
            store,
            latest: RwLock::new(None),
            default_workers,
        }
    }

    pub fn default_workers(&self) -> usize {
        self.default_workers
    }

    /// Score the candidates of `group` and publish the outcome.
    ///
    /// `max_stocks == 0` scans every candidate. Readers keep seeing the
    /// previous snapshot until this one is complete.
    pub async fn refresh(&self, group: CandidateGroup, max_stocks: usize, workers: Option<usize>) -> Arc<ScanSnapshot> {
        let listing = self.candidates.list(group).await;
        let total_candidates = listing.tickers.len();
        let mut tickers = listing.tickers;
        if max_stocks > 0 {
            tickers.truncate(max_stocks);
        }

        let workers = workers.unwrap_or(self.default_workers);
        info!(
            "Refreshing {} ({} of {} candidates, {} workers)",
            group,
            tickers.len(),
            total_candidates,
            workers
        );
        let report = self.engine.score_batch(&tickers, workers).await;

        let run_id = Uuid::new_v4().to_string();
        self.persist(&run_id, &report.results);

        let snapshot = Arc::new(ScanSnapshot {
            run_id,
            group,
            refreshed_at: Utc::now(),
            total_candidates,
            sources: listing.sources,
            report,
        });
        *self.latest.write().await = Some(snapshot.clone());
        snapshot
    }

    fn persist(&self, run_id: &str, results: &[ScoreResult]) {
        let Some(store) = &self.store else {
            return;
        };
        let mut saved = 0;
        for result in results {
            match store.save_prediction(run_id, result) {
                Ok(()) => saved += 1,
                Err(e) => warn!("Failed to persist {} for run {}: {}", result.ticker, run_id, e),
            }
        }
        info!("Persisted {}/{} results for run {}", saved, results.len(), run_id);
    }

    /// The last published scan, if any refresh has completed.
    pub async fn latest(&self) -> Option<Arc<ScanSnapshot>> {
        self.latest.read().await.clone()
    }

    /// Best rows of the most recent persisted run. Errors read as empty.
    pub fn persisted(&self, limit: usize) -> Vec<StoredPrediction> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        store.latest_predictions(limit).unwrap_or_else(|e| {
            warn!("Failed to load persisted predictions: {}", e);
            Vec::new()
        })
    }

    /// Row count of a persisted run, regardless of any display limit.
    pub fn persisted_total(&self, run_id: &str) -> usize {
        let Some(store) = &self.store else {
            return 0;
        };
        store.run_size(run_id).unwrap_or_else(|e| {
            warn!("Failed to count persisted run {}: {}", run_id, e);
            0
        })
    }

    pub fn engine(&self) -> &SurgeEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScoreStats, ScoreStatus, SentimentDetail, SentimentReading};

    fn result(ticker: &str, total: f64) -> ScoreResult {
        ScoreResult {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            sector: "N/A".to_string(),
            current_price: 1.0,
            total_score: total,
            technical_score: total,
            technical_status: ScoreStatus::Computed,
            sentiment_score: 50.0,
            volume_score: 50.0,
            volume_status: ScoreStatus::Computed,
            ml_surge_probability: 50.0,
            ml_status: ScoreStatus::NoModel,
            signals: vec![],
            indicators: None,
            sentiment_detail: SentimentDetail {
                score: 50.0,
                news_score: 50.0,
                news: SentimentReading::empty(),
                news_secondary: None,
                social: SentimentReading::empty(),
            },
            price_history: vec![],
        }
    }

    fn snapshot(results: Vec<ScoreResult>) -> ScanSnapshot {
        let stats = ScoreStats::from_ranked(&results);
        ScanSnapshot {
            run_id: "run".into(),
            group: CandidateGroup::Default,
            refreshed_at: Utc::now(),
            total_candidates: results.len() + 1,
            sources: BTreeMap::new(),
            report: BatchReport {
                results,
                failed: vec!["BAD".into()],
                stats,
                elapsed_seconds: 1.26,
            },
        }
    }

    #[test]
    fn test_filtered_applies_min_score_then_limit() {
        let snap = snapshot(vec![result("A", 80.0), result("B", 65.0), result("C", 64.0), result("D", 40.0)]);
        let picked: Vec<&str> = snap.filtered(60.0, 2).iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(picked, vec!["A", "B"]);
        assert_eq!(snap.filtered(90.0, 10).len(), 0);
        assert_eq!(snap.filtered(0.0, 200).len(), 4);
    }

    #[test]
    fn test_info_summarizes_report() {
        let snap = snapshot(vec![result("A", 80.0)]);
        let info = snap.info();
        assert_eq!(info.analyzed, 1);
        assert_eq!(info.failed, 1);
        assert_eq!(info.failed_tickers, vec!["BAD"]);
        assert_eq!(info.total_candidates, 2);
        assert_eq!(info.elapsed_seconds, 1.3);
    }
}

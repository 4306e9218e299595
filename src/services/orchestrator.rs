//! Bounded-concurrency batch scoring.

use crate::error::Result;
use crate::types::{BatchReport, ScoreResult, ScoreStats};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Score every ticker with at most `workers` in flight (clamped to
/// `1..=max_workers`).
///
/// Each ticker succeeds or fails on its own; failures (including panicked
/// tasks) are listed in input order. Results are ranked by descending total
/// score, equal scores keeping input order.
pub async fn score_batch<F, Fut>(tickers: &[String], workers: usize, max_workers: usize, score: F) -> BatchReport
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<ScoreResult>> + Send + 'static,
{
    let start = Instant::now();
    let workers = workers.clamp(1, max_workers.max(1));
    let semaphore = Arc::new(Semaphore::new(workers));

    let handles: Vec<_> = tickers
        .iter()
        .map(|ticker| {
            let semaphore = Arc::clone(&semaphore);
            let task = score(ticker.clone());
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                task.await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(tickers.len());
    let mut failed = Vec::new();
    for (ticker, handle) in tickers.iter().zip(handles) {
        match handle.await {
            Ok(Ok(result)) => results.push(result),
            Ok(Err(e)) => {
                debug!("Scoring {} failed: {}", ticker, e);
                failed.push(ticker.clone());
            }
            Err(e) => {
                warn!("Scoring task for {} aborted: {}", ticker, e);
                failed.push(ticker.clone());
            }
        }
    }

    rank(&mut results);
    let stats = ScoreStats::from_ranked(&results);
    let elapsed_seconds = start.elapsed().as_secs_f64();
    info!(
        "Scored {}/{} tickers in {:.1}s with {} workers ({} strong, {} moderate)",
        results.len(),
        tickers.len(),
        elapsed_seconds,
        workers,
        stats.strong,
        stats.moderate
    );

    BatchReport {
        results,
        failed,
        stats,
        elapsed_seconds,
    }
}

/// Stable sort by descending total score.
pub fn rank(results: &mut [ScoreResult]) {
    results.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
}

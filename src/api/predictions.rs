//! Scan endpoints: latest predictions, refresh, screener info.

use super::{check_range, DISCLAIMER};
use crate::error::Result;
use crate::services::ScanInfo;
use crate::sources::CandidateGroup;
use crate::types::{ScoreResult, ScoreStats};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;
const MAX_STOCKS: i64 = 500;
/// Predictions echoed back by a refresh.
const REFRESH_PREVIEW: usize = 50;

/// Query parameters for `/api/predictions`.
#[derive(Debug, Deserialize)]
pub struct PredictionsQuery {
    pub limit: Option<i64>,
    pub min_score: Option<f64>,
}

/// Where a predictions payload was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionsOrigin {
    Memory,
    Database,
    None,
}

#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub disclaimer: &'static str,
    pub origin: PredictionsOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
    pub total_analyzed: usize,
    pub showing: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ScoreStats>,
    pub predictions: Vec<ScoreResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// GET /api/predictions
async fn get_predictions(
    State(state): State<AppState>,
    Query(query): Query<PredictionsQuery>,
) -> Result<Json<PredictionsResponse>> {
    let limit = check_range("limit", query.limit.unwrap_or(DEFAULT_LIMIT), 1, MAX_LIMIT)? as usize;
    let min_score = check_range("min_score", query.min_score.unwrap_or(0.0), 0.0, 100.0)?;

    if let Some(snapshot) = state.scan.latest().await {
        let predictions: Vec<ScoreResult> = snapshot.filtered(min_score, limit).into_iter().cloned().collect();
        return Ok(Json(PredictionsResponse {
            disclaimer: DISCLAIMER,
            origin: PredictionsOrigin::Memory,
            run_id: Some(snapshot.run_id.clone()),
            refreshed_at: Some(snapshot.refreshed_at),
            total_analyzed: snapshot.report.results.len(),
            showing: predictions.len(),
            stats: Some(snapshot.report.stats),
            predictions,
            message: None,
        }));
    }

    let stored = state.scan.persisted(limit);
    if !stored.is_empty() {
        let run_id = stored.first().map(|p| p.run_id.clone());
        let total_analyzed = run_id
            .as_deref()
            .map(|id| state.scan.persisted_total(id))
            .unwrap_or_default()
            .max(stored.len());
        let predictions: Vec<ScoreResult> = stored
            .into_iter()
            .map(|p| p.analysis)
            .filter(|r| r.total_score >= min_score)
            .collect();
        return Ok(Json(PredictionsResponse {
            disclaimer: DISCLAIMER,
            origin: PredictionsOrigin::Database,
            run_id,
            refreshed_at: None,
            total_analyzed,
            showing: predictions.len(),
            stats: None,
            predictions,
            message: None,
        }));
    }

    Ok(Json(PredictionsResponse {
        disclaimer: DISCLAIMER,
        origin: PredictionsOrigin::None,
        run_id: None,
        refreshed_at: None,
        total_analyzed: 0,
        showing: 0,
        stats: None,
        predictions: Vec::new(),
        message: Some("No predictions yet. Call /api/refresh to generate predictions."),
    }))
}

/// Query parameters for `/api/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    /// 0 scans every candidate.
    pub max_stocks: Option<i64>,
    pub workers: Option<i64>,
    pub group: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub disclaimer: &'static str,
    pub status: &'static str,
    pub scan_info: ScanInfo,
    pub stats: ScoreStats,
    pub predictions: Vec<ScoreResult>,
}

/// GET /api/refresh
async fn refresh(State(state): State<AppState>, Query(query): Query<RefreshQuery>) -> Result<Json<RefreshResponse>> {
    let max_stocks = check_range("max_stocks", query.max_stocks.unwrap_or(0), 0, MAX_STOCKS)? as usize;
    let max_workers = state.engine.max_workers().max(1) as i64;
    let workers = check_range(
        "workers",
        query.workers.unwrap_or(state.scan.default_workers() as i64),
        1,
        max_workers,
    )? as usize;
    let group: CandidateGroup = match query.group.as_deref() {
        Some(name) => name.parse()?,
        None => CandidateGroup::All,
    };

    let snapshot = state.scan.refresh(group, max_stocks, Some(workers)).await;
    Ok(Json(RefreshResponse {
        disclaimer: DISCLAIMER,
        status: "refreshed",
        scan_info: snapshot.info(),
        stats: snapshot.report.stats,
        predictions: snapshot.report.results.iter().take(REFRESH_PREVIEW).cloned().collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct GroupDescription {
    pub group: CandidateGroup,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ScreenerInfoResponse {
    pub groups: Vec<GroupDescription>,
    pub last_refresh: Option<ScanInfo>,
}

/// GET /api/screener-info
async fn screener_info(State(state): State<AppState>) -> Json<ScreenerInfoResponse> {
    let groups = CandidateGroup::ALL
        .iter()
        .map(|&group| GroupDescription {
            group,
            description: group.description(),
        })
        .collect();
    let last_refresh = state.scan.latest().await.map(|s| s.info());
    Json(ScreenerInfoResponse { groups, last_refresh })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/predictions", get(get_predictions))
        .route("/api/refresh", get(refresh))
        .route("/api/screener-info", get(screener_info))
}

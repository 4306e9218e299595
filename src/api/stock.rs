//! Per-ticker analysis endpoints.

use super::{parse_ticker, DISCLAIMER};
use crate::error::Result;
use crate::types::{ScoreResult, ScoreStatus, SentimentDetail};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub disclaimer: &'static str,
    pub analysis: ScoreResult,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub disclaimer: &'static str,
    pub ticker: String,
    /// `unavailable` when no provider returned anything.
    pub status: ScoreStatus,
    pub sentiment: SentimentDetail,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub disclaimer: &'static str,
    pub ticker: String,
    pub ml_surge_probability: f64,
    pub status: ScoreStatus,
}

/// GET /api/stock/:ticker
async fn get_stock(State(state): State<AppState>, Path(ticker): Path<String>) -> Result<Json<StockResponse>> {
    let ticker = parse_ticker(&ticker)?;
    debug!("Analyzing {}", ticker);
    let analysis = state.engine.score_one(&ticker).await?;
    Ok(Json(StockResponse {
        disclaimer: DISCLAIMER,
        analysis,
    }))
}

/// GET /api/sentiment/:ticker
async fn get_sentiment(State(state): State<AppState>, Path(ticker): Path<String>) -> Result<Json<SentimentResponse>> {
    let ticker = parse_ticker(&ticker)?;
    let sentiment = state.engine.get_sentiment(&ticker).await;
    let status = if sentiment.is_unavailable() {
        ScoreStatus::Unavailable
    } else {
        ScoreStatus::Computed
    };
    Ok(Json(SentimentResponse {
        disclaimer: DISCLAIMER,
        ticker,
        status,
        sentiment,
    }))
}

/// GET /api/predict/:ticker
async fn get_prediction(State(state): State<AppState>, Path(ticker): Path<String>) -> Result<Json<PredictResponse>> {
    let ticker = parse_ticker(&ticker)?;
    let estimate = state.engine.predict_surge(&ticker).await;
    Ok(Json(PredictResponse {
        disclaimer: DISCLAIMER,
        ticker,
        ml_surge_probability: estimate.probability,
        status: estimate.status,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stock/:ticker", get(get_stock))
        .route("/api/sentiment/:ticker", get(get_sentiment))
        .route("/api/predict/:ticker", get(get_prediction))
}

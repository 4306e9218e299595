//! Surge classifier endpoints.

use super::parse_ticker;
use crate::error::Result;
use crate::types::{ModelInfo, TrainOutcome, FEATURE_COUNT, FEATURE_NAMES};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Query parameters for `/api/train`.
#[derive(Debug, Deserialize)]
pub struct TrainQuery {
    /// Comma-separated tickers; the default training list when absent.
    pub tickers: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub status: &'static str,
    pub details: TrainOutcome,
}

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    #[serde(flatten)]
    pub info: ModelInfo,
    pub features: [&'static str; FEATURE_COUNT],
}

/// Split `A,b, C` into normalized tickers. Blank input means "use defaults".
pub(crate) fn parse_ticker_list(raw: Option<&str>) -> Result<Option<Vec<String>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let tickers = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(parse_ticker)
        .collect::<Result<Vec<_>>>()?;
    Ok((!tickers.is_empty()).then_some(tickers))
}

/// GET /api/train
async fn train(State(state): State<AppState>, Query(query): Query<TrainQuery>) -> Result<Json<TrainResponse>> {
    let tickers = parse_ticker_list(query.tickers.as_deref())?;
    info!("Training requested ({} tickers)", tickers.as_ref().map_or(0, Vec::len));
    let details = state.engine.train_classifier(tickers).await;
    let status = match &details {
        TrainOutcome::Success { .. } => "success",
        TrainOutcome::Error { .. } => "error",
        TrainOutcome::AlreadyTraining { .. } => "already_training",
    };
    Ok(Json(TrainResponse { status, details }))
}

/// GET /api/model
async fn model(State(state): State<AppState>) -> Json<ModelResponse> {
    Json(ModelResponse {
        info: state.engine.model_info(),
        features: FEATURE_NAMES,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/train", get(train))
        .route("/api/model", get(model))
}

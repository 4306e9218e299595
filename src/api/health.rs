use super::DISCLAIMER;
use crate::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct IndexResponse {
    message: &'static str,
    version: &'static str,
    disclaimer: &'static str,
    endpoints: BTreeMap<&'static str, &'static str>,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /
async fn index() -> Json<IndexResponse> {
    let endpoints = BTreeMap::from([
        ("/api/predictions", "Latest ranked scan (limit, min_score)"),
        ("/api/stock/:ticker", "Full analysis for one ticker"),
        ("/api/sentiment/:ticker", "News and social sentiment for one ticker"),
        ("/api/predict/:ticker", "Surge classifier probability for one ticker"),
        ("/api/refresh", "Rescan candidates (max_stocks, workers, group)"),
        ("/api/train", "Train the surge classifier (tickers=A,B,...)"),
        ("/api/model", "Surge classifier status"),
        ("/api/screener-info", "Candidate groups and the last refresh"),
    ]);
    Json(IndexResponse {
        message: "US stock surge likelihood scanner",
        version: env!("CARGO_PKG_VERSION"),
        disclaimer: DISCLAIMER,
        endpoints,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler() {
        let Json(response) = health().await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_index_lists_endpoints_and_disclaimer() {
        let Json(response) = index().await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["disclaimer"], DISCLAIMER);
        assert!(json["endpoints"]["/api/refresh"].is_string());
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No data for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a per-ticker data failure.
    pub fn unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        AppError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::DataUnavailable { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Reqwest(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::SerdeJson(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::Sqlite(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Anyhow(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Reasons a training run does not produce a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainingError {
    #[error("Insufficient training data: {samples} examples, need at least {required}")]
    InsufficientTrainingData { samples: usize, required: usize },

    #[error("A training run is already in progress")]
    AlreadyTraining,

    #[error("Model fitting failed: {0}")]
    Fitting(String),

    #[error("Failed to persist model: {0}")]
    Persist(String),
}

/// Failures while scoring a feature vector against the active model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Model expects {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("Model was trained on a single class")]
    DegenerateModel,
}

pub type Result<T> = std::result::Result<T, AppError>;

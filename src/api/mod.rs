pub mod health;
pub mod model;
pub mod predictions;
pub mod stock;

use crate::error::{AppError, Result};
use crate::types::normalize_ticker;
use crate::AppState;
use axum::Router;

/// Attached to every scan and analysis payload.
pub const DISCLAIMER: &str = "For educational purposes only. NOT investment advice.";

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(predictions::router())
        .merge(stock::router())
        .merge(model::router())
}

/// Reject values outside `min..=max` with a 400.
pub(crate) fn check_range<T>(name: &str, value: T, min: T, max: T) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if !(value >= min && value <= max) {
        return Err(AppError::BadRequest(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(value)
}

pub(crate) fn parse_ticker(raw: &str) -> Result<String> {
    normalize_ticker(raw).ok_or_else(|| AppError::BadRequest(format!("Invalid ticker '{}'", raw)))
}

//! NewsAPI "everything" search, used when `NEWSAPI_KEY` is configured.

use super::{http_client, NewsSource};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const NEWSAPI_URL: &str = "https://newsapi.org/v2/everything";
const PAGE_SIZE: usize = 10;
const LOOKBACK_DAYS: i64 = 3;
/// Placeholder title NewsAPI uses for withdrawn articles.
const REMOVED: &str = "[Removed]";

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
}

pub struct NewsApiClient {
    client: Client,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key,
        }
    }
}

fn titles(response: NewsApiResponse) -> Result<Vec<String>> {
    if response.status != "ok" {
        return Err(AppError::ExternalApi(format!(
            "NewsAPI error: {}",
            response.message.unwrap_or(response.status)
        )));
    }
    Ok(response
        .articles
        .into_iter()
        .filter_map(|a| a.title)
        .filter(|t| !t.trim().is_empty() && t != REMOVED)
        .take(PAGE_SIZE)
        .collect())
}

#[async_trait]
impl NewsSource for NewsApiClient {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn fetch_headlines(&self, ticker: &str) -> Result<Vec<String>> {
        let from = (Utc::now() - ChronoDuration::days(LOOKBACK_DAYS)).format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(NEWSAPI_URL)
            .query(&[
                ("q", ticker.to_uppercase()),
                ("language", "en".to_string()),
                ("sortBy", "publishedAt".to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
                ("from", from),
                ("apiKey", self.api_key.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!("NewsAPI returned {}", response.status())));
        }
        titles(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_filter_removed_articles() {
        let json = r#"{"status": "ok", "totalResults": 3, "articles": [
            {"title": "Nvidia rallies on AI demand"},
            {"title": "[Removed]"},
            {"title": null}
        ]}"#;
        let response: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(titles(response).unwrap(), vec!["Nvidia rallies on AI demand"]);
    }

    #[test]
    fn test_error_status() {
        let json = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;
        let response: NewsApiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(titles(response), Err(AppError::ExternalApi(m)) if m.contains("invalid")));
    }
}

//! Finnhub company-news client.
//!
//! Only constructed when `FINNHUB_API_KEY` is configured.

use super::{http_client, NewsSource};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const FINNHUB_URL: &str = "https://finnhub.io/api/v1";
const LOOKBACK_DAYS: i64 = 3;
const MAX_HEADLINES: usize = 15;

/// One item of the company-news endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FinnhubArticle {
    #[serde(default)]
    pub headline: String,
    pub source: Option<String>,
    /// Unix seconds.
    pub datetime: Option<i64>,
}

/// Finnhub API client.
pub struct FinnhubNewsClient {
    client: Client,
    api_key: String,
}

impl FinnhubNewsClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key,
        }
    }

    /// Company news between `from` and `to` (inclusive).
    pub async fn company_news(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<FinnhubArticle>> {
        let url = format!("{}/company-news", FINNHUB_URL);
        debug!("Fetching Finnhub news for {}", symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.to_uppercase()),
                ("from", from.format("%Y-%m-%d").to_string()),
                ("to", to.format("%Y-%m-%d").to_string()),
                ("token", self.api_key.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!("Finnhub returned {}", response.status())));
        }
        Ok(response.json::<Vec<FinnhubArticle>>().await?)
    }
}

fn headlines(articles: Vec<FinnhubArticle>) -> Vec<String> {
    articles
        .into_iter()
        .map(|a| a.headline.trim().to_string())
        .filter(|h| !h.is_empty())
        .take(MAX_HEADLINES)
        .collect()
}

#[async_trait]
impl NewsSource for FinnhubNewsClient {
    fn name(&self) -> &str {
        "finnhub"
    }

    async fn fetch_headlines(&self, ticker: &str) -> Result<Vec<String>> {
        let to = Utc::now().date_naive();
        let from = to - ChronoDuration::days(LOOKBACK_DAYS);
        Ok(headlines(self.company_news(ticker, from, to).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_deserialization() {
        let json = r#"[
            {"category": "company", "datetime": 1717500000, "headline": "Apple unveils new chips", "source": "Reuters"},
            {"category": "company", "datetime": 1717400000, "headline": "  ", "source": "Yahoo"},
            {"category": "company"}
        ]"#;
        let articles: Vec<FinnhubArticle> = serde_json::from_str(json).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].source.as_deref(), Some("Reuters"));
        assert_eq!(headlines(articles), vec!["Apple unveils new chips"]);
    }

    #[test]
    fn test_headlines_capped() {
        let articles = (0..40)
            .map(|i| FinnhubArticle {
                headline: format!("headline {}", i),
                source: None,
                datetime: None,
            })
            .collect();
        assert_eq!(headlines(articles).len(), MAX_HEADLINES);
    }
}

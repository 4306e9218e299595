//! StockTwits symbol stream. Messages carry optional native Bullish/Bearish labels.

use super::{http_client, SocialSource};
use crate::error::{AppError, Result};
use crate::types::{SocialLabel, SocialPost};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const STREAM_URL: &str = "https://api.stocktwits.com/api/2/streams/symbol";
const MAX_MESSAGES: usize = 30;

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    body: String,
    entities: Option<Entities>,
}

#[derive(Debug, Deserialize)]
struct Entities {
    sentiment: Option<Sentiment>,
}

#[derive(Debug, Deserialize)]
struct Sentiment {
    basic: Option<String>,
}

pub struct StockTwitsClient {
    client: Client,
}

impl StockTwitsClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

fn posts(response: StreamResponse) -> Vec<SocialPost> {
    response
        .messages
        .into_iter()
        .take(MAX_MESSAGES)
        .map(|m| {
            let label = m
                .entities
                .and_then(|e| e.sentiment)
                .and_then(|s| s.basic)
                .and_then(|basic| match basic.as_str() {
                    "Bullish" => Some(SocialLabel::Bullish),
                    "Bearish" => Some(SocialLabel::Bearish),
                    _ => None,
                });
            SocialPost { text: m.body, label }
        })
        .collect()
}

#[async_trait]
impl SocialSource for StockTwitsClient {
    fn name(&self) -> &str {
        "stocktwits"
    }

    async fn fetch_posts(&self, ticker: &str) -> Result<Vec<SocialPost>> {
        let url = format!("{}/{}.json", STREAM_URL, ticker.to_uppercase());
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!("StockTwits returned {}", response.status())));
        }
        Ok(posts(response.json().await?))
    }
}

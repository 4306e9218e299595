//! Reddit public search. Only titles that mention the ticker are kept.

use super::{http_client, SocialSource};
use crate::error::{AppError, Result};
use crate::types::SocialPost;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const SEARCH_URL: &str = "https://www.reddit.com/search.json";
const LIMIT: usize = 25;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    #[serde(default)]
    title: String,
}

pub struct RedditClient {
    client: Client,
}

impl RedditClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }
}

fn mentioning(listing: Listing, ticker: &str) -> Vec<SocialPost> {
    let needle = ticker.to_uppercase();
    listing
        .data
        .children
        .into_iter()
        .map(|c| c.data.title)
        .filter(|title| title.to_uppercase().contains(&needle))
        .map(SocialPost::new)
        .collect()
}

#[async_trait]
impl SocialSource for RedditClient {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn fetch_posts(&self, ticker: &str) -> Result<Vec<SocialPost>> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("q", format!("{} stock", ticker.to_uppercase())),
                ("sort", "new".to_string()),
                ("limit", LIMIT.to_string()),
                ("t", "week".to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!("Reddit returned {}", response.status())));
        }
        Ok(mentioning(response.json().await?, ticker))
    }
}

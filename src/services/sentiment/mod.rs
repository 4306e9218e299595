//! Multi-provider sentiment aggregation.
//!
//! Every provider is queried concurrently and independently. A provider that
//! errors or returns nothing contributes the empty reading; blending proceeds
//! with whatever came back.
//!
//! Blend policy:
//! - news: the two providers with the most items, weighted 65/35 by rank
//!   (equal counts keep provider order); one provider alone is used as-is;
//!   none gives neutral 50
//! - social: the provider with the most items (first wins a tie)
//! - final: news * 0.6 + social * 0.4 when social has data, else news

pub mod lexicon;

pub use lexicon::PolarityAnalyzer;

use crate::sources::{NewsSource, SocialSource};
use crate::types::{round_to, SentimentDetail, SentimentReading, SocialLabel, SocialPost};
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Headlines scored per news provider.
pub const MAX_NEWS_ITEMS: usize = 15;
/// Messages scored per social provider.
pub const MAX_SOCIAL_ITEMS: usize = 30;
const MAX_SAMPLES: usize = 5;

const PRIMARY_NEWS_WEIGHT: f64 = 0.65;
const SECONDARY_NEWS_WEIGHT: f64 = 0.35;
const NEWS_WEIGHT: f64 = 0.6;
const SOCIAL_WEIGHT: f64 = 0.4;

/// Queries news and social providers and blends them into one score.
pub struct SentimentAggregator {
    analyzer: PolarityAnalyzer,
    news: Vec<Arc<dyn NewsSource>>,
    social: Vec<Arc<dyn SocialSource>>,
}

impl SentimentAggregator {
    pub fn new(news: Vec<Arc<dyn NewsSource>>, social: Vec<Arc<dyn SocialSource>>) -> Self {
        Self {
            analyzer: PolarityAnalyzer::new(),
            news,
            social,
        }
    }

    /// Fetch, score and blend every provider for `ticker`.
    pub async fn analyze(&self, ticker: &str) -> SentimentDetail {
        let news_futures = self.news.iter().map(|source| self.news_reading(source.as_ref(), ticker));
        let social_futures = self.social.iter().map(|source| self.social_reading(source.as_ref(), ticker));

        let (news, social) = tokio::join!(join_all(news_futures), join_all(social_futures));
        let detail = combine(news, social);
        debug!(
            "Sentiment for {}: {} (news {}, social {} via {})",
            ticker, detail.score, detail.news_score, detail.social.score, detail.social.source
        );
        detail
    }

    async fn news_reading(&self, source: &dyn NewsSource, ticker: &str) -> SentimentReading {
        match source.fetch_headlines(ticker).await {
            Ok(mut headlines) => {
                headlines.truncate(MAX_NEWS_ITEMS);
                self.score_headlines(source.name(), &headlines)
            }
            Err(e) => {
                warn!("News provider {} failed for {}: {}", source.name(), ticker, e);
                SentimentReading::empty()
            }
        }
    }

    async fn social_reading(&self, source: &dyn SocialSource, ticker: &str) -> SentimentReading {
        match source.fetch_posts(ticker).await {
            Ok(mut posts) => {
                posts.truncate(MAX_SOCIAL_ITEMS);
                self.score_posts(source.name(), &posts)
            }
            Err(e) => {
                warn!("Social provider {} failed for {}: {}", source.name(), ticker, e);
                SentimentReading::empty()
            }
        }
    }

    /// Lexicon reading for a list of headlines.
    pub fn score_headlines(&self, source: &str, texts: &[String]) -> SentimentReading {
        let texts: Vec<String> = texts.iter().filter(|t| !t.trim().is_empty()).cloned().collect();
        let Some(avg) = self.analyzer.average(&texts) else {
            return SentimentReading::empty();
        };

        SentimentReading {
            score: normalize_polarity(avg),
            item_count: texts.len(),
            average_polarity: round_to(avg, 3),
            sample_items: texts.iter().take(MAX_SAMPLES).cloned().collect(),
            source: source.to_string(),
            bullish: None,
            bearish: None,
        }
    }

    /// Lexicon reading for social posts, blended 50/50 with native labels when
    /// at least one post is labeled.
    pub fn score_posts(&self, source: &str, posts: &[SocialPost]) -> SentimentReading {
        let texts: Vec<String> = posts.iter().map(|p| p.text.clone()).collect();
        let mut reading = self.score_headlines(source, &texts);
        if !reading.has_data() {
            return reading;
        }

        let bullish = posts.iter().filter(|p| p.label == Some(SocialLabel::Bullish)).count();
        let bearish = posts.iter().filter(|p| p.label == Some(SocialLabel::Bearish)).count();
        if bullish + bearish > 0 {
            let native = bullish as f64 / (bullish + bearish) as f64 * 100.0;
            reading.score = round_to(reading.score * 0.5 + native * 0.5, 1);
            reading.bullish = Some(bullish);
            reading.bearish = Some(bearish);
        }
        reading
    }
}

/// Map a polarity in [-1, 1] onto 0-100.
pub fn normalize_polarity(polarity: f64) -> f64 {
    round_to((polarity.clamp(-1.0, 1.0) + 1.0) * 50.0, 1)
}

/// Apply the blend policy to provider readings given in provider order.
pub fn combine(news: Vec<SentimentReading>, social: Vec<SentimentReading>) -> SentimentDetail {
    let mut ranked: Vec<SentimentReading> = news.into_iter().filter(|r| r.has_data()).collect();
    // Stable: equal counts keep provider order.
    ranked.sort_by(|a, b| b.item_count.cmp(&a.item_count));
    let mut ranked = ranked.into_iter();

    // Unrounded; only the reported values are rounded.
    let (news_blend, primary, secondary) = match (ranked.next(), ranked.next()) {
        (Some(primary), Some(secondary)) => (
            primary.score * PRIMARY_NEWS_WEIGHT + secondary.score * SECONDARY_NEWS_WEIGHT,
            primary,
            Some(secondary),
        ),
        (Some(primary), None) => (primary.score, primary, None),
        _ => (50.0, SentimentReading::empty(), None),
    };

    let social = social
        .into_iter()
        .filter(|r| r.has_data())
        .fold(None::<SentimentReading>, |best, r| match best {
            Some(b) if b.item_count >= r.item_count => Some(b),
            _ => Some(r),
        })
        .unwrap_or_default();

    let score = if social.has_data() {
        round_to(news_blend * NEWS_WEIGHT + social.score * SOCIAL_WEIGHT, 1)
    } else {
        round_to(news_blend, 1)
    };

    SentimentDetail {
        score,
        news_score: round_to(news_blend, 1),
        news: primary,
        news_secondary: secondary,
        social,
    }
}

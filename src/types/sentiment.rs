use serde::{Deserialize, Serialize};

/// Source name reported by the "no data" reading.
pub const NO_SOURCE: &str = "none";

/// Sentiment measured from one news or social provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    /// 0-100, rounded to one decimal.
    pub score: f64,
    /// Headlines or messages that were scored.
    pub item_count: usize,
    /// Mean compound polarity in [-1, 1].
    pub average_polarity: f64,
    /// Up to five of the scored texts.
    pub sample_items: Vec<String>,
    pub source: String,
    /// Natively labeled bullish messages (StockTwits only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullish: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearish: Option<usize>,
}

impl SentimentReading {
    /// The "unavailable" sentinel: neutral score, zero items.
    pub fn empty() -> Self {
        Self {
            score: 50.0,
            item_count: 0,
            average_polarity: 0.0,
            sample_items: Vec::new(),
            source: NO_SOURCE.to_string(),
            bullish: None,
            bearish: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.item_count > 0
    }
}

impl Default for SentimentReading {
    fn default() -> Self {
        Self::empty()
    }
}

/// Blended sentiment for a ticker with the readings that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentDetail {
    /// 0-100, rounded to one decimal.
    pub score: f64,
    /// Combined news score before the social blend.
    pub news_score: f64,
    /// News provider with the most items.
    pub news: SentimentReading,
    /// Runner-up news provider, when it had data.
    pub news_secondary: Option<SentimentReading>,
    /// Chosen social provider, or the empty reading.
    pub social: SentimentReading,
}

impl SentimentDetail {
    /// True when no provider returned anything.
    pub fn is_unavailable(&self) -> bool {
        !self.news.has_data() && !self.social.has_data()
    }
}

/// Native label attached to a social message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialLabel {
    Bullish,
    Bearish,
}

/// A social message as fetched from a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub text: String,
    pub label: Option<SocialLabel>,
}

impl SocialPost {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: None,
        }
    }

    pub fn labeled(text: impl Into<String>, label: SocialLabel) -> Self {
        Self {
            text: text.into(),
            label: Some(label),
        }
    }
}

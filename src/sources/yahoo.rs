//! Yahoo Finance client: daily history, quote metadata, headline search and
//! predefined screeners.
//!
//! Uses the unofficial public JSON endpoints (no API key).

use super::{http_client, CandidateGroup, MarketDataProvider, NewsSource, ScreenSource};
use crate::error::{AppError, Result};
use crate::types::{Bar, HistoryPeriod, PriceHistory, StockInfo};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";
const TRENDING_URL: &str = "https://query1.finance.yahoo.com/v1/finance/trending/US";
const SCREENER_URL: &str = "https://query1.finance.yahoo.com/v1/finance/screener/predefined/saved";

const MAX_HEADLINES: usize = 15;
const TRENDING_COUNT: usize = 25;
const SCREENER_COUNT: usize = 40;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    regular_market_volume: Option<f64>,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    asset_profile: Option<AssetProfile>,
    summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    market_cap: Option<RawValue>,
    average_volume: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
struct SearchNews {
    title: Option<String>,
}

/// Shared envelope of the trending and screener endpoints.
#[derive(Debug, Deserialize)]
struct FinanceResponse {
    finance: Finance,
}

#[derive(Debug, Deserialize)]
struct Finance {
    result: Option<Vec<FinanceResult>>,
}

#[derive(Debug, Deserialize)]
struct FinanceResult {
    #[serde(default)]
    quotes: Vec<FinanceQuote>,
}

#[derive(Debug, Deserialize)]
struct FinanceQuote {
    symbol: Option<String>,
}

/// Yahoo uses hyphens instead of dots for share classes (BRK-B, not BRK.B).
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

/// Yahoo Finance API client.
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!("Yahoo returned {} for {}", response.status(), url)));
        }
        Ok(response.json::<T>().await?)
    }

    async fn chart(&self, ticker: &str, range: &str) -> Result<ChartResult> {
        let url = format!("{}/{}", CHART_URL, normalize_yahoo_symbol(ticker));
        let data: ChartResponse = self
            .get_json(
                &url,
                &[
                    ("range", range.to_string()),
                    ("interval", "1d".to_string()),
                    ("includePrePost", "false".to_string()),
                ],
            )
            .await?;
        first_chart_result(ticker, data)
    }

    async fn quote_summary(&self, ticker: &str) -> Result<QuoteSummaryResult> {
        let url = format!("{}/{}", QUOTE_SUMMARY_URL, normalize_yahoo_symbol(ticker));
        let data: QuoteSummaryResponse = self
            .get_json(&url, &[("modules", "assetProfile,summaryDetail".to_string())])
            .await?;
        Ok(data
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .unwrap_or_default())
    }
}

fn first_chart_result(ticker: &str, data: ChartResponse) -> Result<ChartResult> {
    if let Some(error) = data.chart.error {
        return Err(AppError::unavailable(ticker, format!("{} - {}", error.code, error.description)));
    }
    data.chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AppError::unavailable(ticker, "no chart result"))
}

/// Daily bars from a chart result. Points without a positive close are skipped.
fn parse_bars(result: &ChartResult) -> Vec<Bar> {
    let Some(timestamps) = &result.timestamp else {
        return Vec::new();
    };
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };

    let at = |series: &Option<Vec<Option<f64>>>, i: usize| -> Option<f64> {
        series.as_ref().and_then(|s| s.get(i).copied().flatten())
    };

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = at(&quote.close, i).filter(|c| *c > 0.0)?;
            let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)?.date_naive();
            Some(Bar {
                date,
                open: at(&quote.open, i).unwrap_or(close),
                high: at(&quote.high, i).unwrap_or(close),
                low: at(&quote.low, i).unwrap_or(close),
                close,
                volume: at(&quote.volume, i).unwrap_or(0.0),
            })
        })
        .collect()
}

fn symbols(response: FinanceResponse) -> Vec<String> {
    response
        .finance
        .result
        .and_then(|r| r.into_iter().next())
        .map(|r| r.quotes.into_iter().filter_map(|q| q.symbol).collect())
        .unwrap_or_default()
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn fetch_history(&self, ticker: &str, period: HistoryPeriod) -> Result<PriceHistory> {
        let result = self.chart(ticker, period.range()).await?;
        let history = PriceHistory::new(parse_bars(&result));
        if history.is_empty() {
            return Err(AppError::unavailable(ticker, "empty price history"));
        }
        Ok(history)
    }

    async fn fetch_metadata(&self, ticker: &str) -> Result<StockInfo> {
        let (chart, summary) = tokio::join!(self.chart(ticker, "5d"), self.quote_summary(ticker));
        let meta = chart?.meta;
        // quoteSummary is frequently gated; profile fields are best-effort.
        let summary = summary.unwrap_or_else(|e| {
            debug!("quoteSummary unavailable for {}: {}", ticker, e);
            QuoteSummaryResult::default()
        });
        Ok(stock_info(ticker, meta, summary))
    }
}

fn stock_info(ticker: &str, meta: ChartMeta, summary: QuoteSummaryResult) -> StockInfo {
    let mut info = StockInfo::unknown(&ticker.to_uppercase());
    if let Some(name) = meta.short_name.or(meta.long_name) {
        info.name = name;
    }
    if let Some(profile) = summary.asset_profile {
        info.sector = profile.sector.unwrap_or(info.sector);
        info.industry = profile.industry.unwrap_or(info.industry);
    }
    let detail = summary.summary_detail.unwrap_or_default();
    info.market_cap = detail.market_cap.and_then(|v| v.raw).unwrap_or(0.0);
    info.avg_volume = detail
        .average_volume
        .and_then(|v| v.raw)
        .or(meta.regular_market_volume)
        .unwrap_or(0.0);
    info.current_price = meta.regular_market_price.unwrap_or(0.0);
    info.previous_close = meta.previous_close.or(meta.chart_previous_close).unwrap_or(0.0);
    info.fifty_two_week_high = meta.fifty_two_week_high.unwrap_or(0.0);
    info.fifty_two_week_low = meta.fifty_two_week_low.unwrap_or(0.0);
    info
}

#[async_trait]
impl NewsSource for YahooFinanceClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_headlines(&self, ticker: &str) -> Result<Vec<String>> {
        let data: SearchResponse = self
            .get_json(
                SEARCH_URL,
                &[
                    ("q", normalize_yahoo_symbol(ticker)),
                    ("newsCount", MAX_HEADLINES.to_string()),
                    ("quotesCount", "0".to_string()),
                ],
            )
            .await?;
        Ok(data
            .news
            .into_iter()
            .filter_map(|n| n.title)
            .filter(|t| !t.trim().is_empty())
            .take(MAX_HEADLINES)
            .collect())
    }
}

#[async_trait]
impl ScreenSource for YahooFinanceClient {
    async fn screen(&self, group: CandidateGroup) -> Result<Vec<String>> {
        let response: FinanceResponse = match group {
            CandidateGroup::Trending => {
                self.get_json(TRENDING_URL, &[("count", TRENDING_COUNT.to_string())])
                    .await?
            }
            other => {
                let Some(id) = other.screener_id() else {
                    return Ok(Vec::new());
                };
                self.get_json(
                    SCREENER_URL,
                    &[("scrIds", id.to_string()), ("count", SCREENER_COUNT.to_string())],
                )
                .await?
            }
        };
        Ok(symbols(response))
    }
}

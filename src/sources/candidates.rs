//! Candidate ticker discovery.

use super::ScreenSource;
use crate::error::AppError;
use crate::types::normalize_ticker;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Curated list of liquid US names always scanned by `all`.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    // Mega cap tech
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "NFLX", "AVGO", "CRM",
    // High beta / retail favorites
    "PLTR", "SOFI", "NIO", "RIVN", "LCID", "MARA", "RIOT", "COIN", "SQ", "SHOP",
    "SNAP", "PINS", "RBLX", "U", "DKNG", "HOOD", "AFRM", "UPST", "PATH", "IONQ",
    // Semis
    "AMD", "INTC", "MU", "MRVL", "ARM", "SMCI", "TSM", "QCOM", "ON", "ASML",
    // Cloud / SaaS
    "CRWD", "ZS", "NET", "SNOW", "ABNB", "DDOG", "MDB", "PANW", "OKTA", "CFLT",
    // Biotech
    "MRNA", "BNTX", "CELH", "HIMS", "DNLI", "SAVA",
    // Consumer / travel / industrial
    "PYPL", "DIS", "BA", "F", "GM", "UAL", "DAL", "CCL", "NCLH", "RCL",
    "WMT", "COST", "TGT", "NKE", "SBUX", "MCD",
    // Energy
    "XOM", "CVX", "OXY", "FSLR", "ENPH", "LI",
    // Financials
    "JPM", "GS", "C", "BAC", "V", "MA",
    // ETFs
    "SPY", "QQQ", "IWM", "XLE", "XLF", "ARKK", "SOXL", "TQQQ",
];

/// Named candidate lists accepted by a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateGroup {
    All,
    Default,
    Trending,
    Gainers,
    MostActive,
    SmallCapGainers,
    Losers,
}

impl CandidateGroup {
    /// Groups backed by a live screener.
    pub const SCREENS: [CandidateGroup; 5] = [
        CandidateGroup::Trending,
        CandidateGroup::Gainers,
        CandidateGroup::MostActive,
        CandidateGroup::SmallCapGainers,
        CandidateGroup::Losers,
    ];

    pub const ALL: [CandidateGroup; 7] = [
        CandidateGroup::All,
        CandidateGroup::Default,
        CandidateGroup::Trending,
        CandidateGroup::Gainers,
        CandidateGroup::MostActive,
        CandidateGroup::SmallCapGainers,
        CandidateGroup::Losers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateGroup::All => "all",
            CandidateGroup::Default => "default",
            CandidateGroup::Trending => "trending",
            CandidateGroup::Gainers => "gainers",
            CandidateGroup::MostActive => "most_active",
            CandidateGroup::SmallCapGainers => "small_cap_gainers",
            CandidateGroup::Losers => "losers",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CandidateGroup::All => "Union of every screen plus the default list",
            CandidateGroup::Default => "Curated list of liquid US stocks and ETFs",
            CandidateGroup::Trending => "Yahoo Finance trending tickers (US)",
            CandidateGroup::Gainers => "Largest percentage gainers today",
            CandidateGroup::MostActive => "Highest trading volume today",
            CandidateGroup::SmallCapGainers => "Small caps with the largest gains today",
            CandidateGroup::Losers => "Largest percentage losers today (rebound candidates)",
        }
    }

    /// Yahoo predefined screener id, for screener-backed groups.
    pub fn screener_id(&self) -> Option<&'static str> {
        match self {
            CandidateGroup::Gainers => Some("day_gainers"),
            CandidateGroup::MostActive => Some("most_actives"),
            CandidateGroup::SmallCapGainers => Some("small_cap_gainers"),
            CandidateGroup::Losers => Some("day_losers"),
            _ => None,
        }
    }
}

impl fmt::Display for CandidateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateGroup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        CandidateGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == name)
            .ok_or_else(|| {
                let valid: Vec<&str> = CandidateGroup::ALL.iter().map(|g| g.as_str()).collect();
                AppError::BadRequest(format!("Unknown group '{}'; expected one of: {}", s, valid.join(", ")))
            })
    }
}

/// Tickers selected for a scan and how many each source contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateListing {
    pub tickers: Vec<String>,
    pub sources: BTreeMap<String, usize>,
}

/// Resolves candidate groups to ticker lists.
pub struct CandidateService {
    screens: Arc<dyn ScreenSource>,
}

impl CandidateService {
    pub fn new(screens: Arc<dyn ScreenSource>) -> Self {
        Self { screens }
    }

    /// Tickers for `group`. A failing screen contributes nothing.
    pub async fn list(&self, group: CandidateGroup) -> CandidateListing {
        match group {
            CandidateGroup::Default => {
                let tickers = default_candidates();
                let sources = BTreeMap::from([(group.to_string(), tickers.len())]);
                CandidateListing { tickers, sources }
            }
            CandidateGroup::All => self.list_all().await,
            screen => {
                let tickers = self.run_screen(screen).await;
                let sources = BTreeMap::from([(screen.to_string(), tickers.len())]);
                CandidateListing { tickers, sources }
            }
        }
    }

    async fn list_all(&self) -> CandidateListing {
        let results = join_all(CandidateGroup::SCREENS.iter().map(|&g| self.run_screen(g))).await;

        let mut union: BTreeSet<String> = default_candidates().into_iter().collect();
        let mut sources = BTreeMap::new();
        for (group, tickers) in CandidateGroup::SCREENS.iter().zip(results) {
            sources.insert(group.to_string(), tickers.len());
            union.extend(tickers);
        }
        sources.insert(CandidateGroup::Default.to_string(), DEFAULT_CANDIDATES.len());

        debug!("Candidate union: {} tickers", union.len());
        CandidateListing {
            tickers: union.into_iter().collect(),
            sources,
        }
    }

    async fn run_screen(&self, group: CandidateGroup) -> Vec<String> {
        match self.screens.screen(group).await {
            Ok(raw) => {
                let mut seen = BTreeSet::new();
                raw.iter()
                    .filter_map(|t| normalize_ticker(t))
                    .filter(|t| seen.insert(t.clone()))
                    .collect()
            }
            Err(e) => {
                warn!("Screen {} failed: {}", group, e);
                Vec::new()
            }
        }
    }
}

fn default_candidates() -> Vec<String> {
    DEFAULT_CANDIDATES.iter().map(|t| t.to_string()).collect()
}

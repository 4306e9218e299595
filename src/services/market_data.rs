//! Market data wrapper adding a history cache and a metadata fallback.

use super::cache::TtlCache;
use super::sqlite_store::SqliteStore;
use crate::error::Result;
use crate::sources::MarketDataProvider;
use crate::types::{HistoryPeriod, PriceHistory, StockInfo};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Reuses recent histories so scoring and the surge model share one fetch,
/// and writes metadata through to SQLite as a last-known fallback.
pub struct CachedMarketData {
    inner: Arc<dyn MarketDataProvider>,
    histories: TtlCache<PriceHistory>,
    store: Option<Arc<SqliteStore>>,
}

impl CachedMarketData {
    pub fn new(inner: Arc<dyn MarketDataProvider>, ttl: Duration, store: Option<Arc<SqliteStore>>) -> Self {
        Self {
            inner,
            histories: TtlCache::new(ttl),
            store,
        }
    }

    fn history_key(ticker: &str, period: HistoryPeriod) -> String {
        format!("{}:{}", ticker.to_uppercase(), period.range())
    }

    /// Drop expired histories.
    pub fn purge_expired(&self) {
        self.histories.purge_expired();
    }
}

#[async_trait]
impl MarketDataProvider for CachedMarketData {
    async fn fetch_history(&self, ticker: &str, period: HistoryPeriod) -> Result<PriceHistory> {
        let key = Self::history_key(ticker, period);
        if let Some(history) = self.histories.get(&key) {
            debug!("History cache hit for {}", key);
            return Ok(history);
        }

        let history = self.inner.fetch_history(ticker, period).await?;
        self.histories.insert(key, history.clone());
        Ok(history)
    }

    async fn fetch_metadata(&self, ticker: &str) -> Result<StockInfo> {
        match self.inner.fetch_metadata(ticker).await {
            Ok(info) => {
                if let Some(store) = &self.store {
                    if let Err(e) = store.cache_stock(&info) {
                        warn!("Failed to cache metadata for {}: {}", ticker, e);
                    }
                }
                Ok(info)
            }
            Err(e) => {
                let cached = self
                    .store
                    .as_ref()
                    .and_then(|store| store.cached_stock(&ticker.to_uppercase()).ok().flatten());
                match cached {
                    Some(info) => {
                        debug!("Using cached metadata for {} after error: {}", ticker, e);
                        Ok(info)
                    }
                    None => Err(e),
                }
            }
        }
    }
}

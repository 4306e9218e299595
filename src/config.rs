use std::env;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database file for scan snapshots and the stock cache.
    pub database_path: PathBuf,
    /// Location of the serialized surge classifier.
    pub model_path: PathBuf,
    /// NewsAPI key (optional, enables the NewsAPI news provider).
    pub newsapi_key: Option<String>,
    /// Finnhub API key (optional, enables the Finnhub company-news provider).
    pub finnhub_api_key: Option<String>,
    /// Default worker count for batch scans.
    pub default_workers: usize,
    /// Upper bound on batch scan workers.
    pub max_workers: usize,
    /// Per-request timeout for outbound HTTP calls (seconds).
    pub http_timeout_secs: u64,
    /// How long a fetched price history is reused (seconds).
    pub history_cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8000),
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("stock_predictor.db")),
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("trained_model.json")),
            newsapi_key: non_empty_var("NEWSAPI_KEY"),
            finnhub_api_key: non_empty_var("FINNHUB_API_KEY"),
            default_workers: parse_var("DEFAULT_WORKERS", 5),
            max_workers: parse_var("MAX_WORKERS", 20),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", 10),
            history_cache_ttl_secs: parse_var("HISTORY_CACHE_TTL_SECS", 300),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

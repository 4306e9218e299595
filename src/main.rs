use std::sync::Arc;
use std::time::Duration;
use surge_radar::api;
use surge_radar::config::Config;
use surge_radar::services::{CachedMarketData, ModelRegistry, ScanService, SentimentAggregator, SqliteStore, SurgeEngine};
use surge_radar::sources::{
    CandidateService, FinnhubNewsClient, NewsApiClient, NewsSource, RedditClient, SocialSource, StockTwitsClient,
    YahooFinanceClient,
};
use surge_radar::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired price histories are dropped.
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surge_radar=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env());
    info!("Starting Surge Radar on {}:{}", config.host, config.port);

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let yahoo = Arc::new(YahooFinanceClient::new(timeout));

    // Persistence is optional; the scanner still works without it
    let store = match SqliteStore::new(&config.database_path) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            warn!("SQLite unavailable at {}: {}", config.database_path.display(), e);
            None
        }
    };

    let market = Arc::new(CachedMarketData::new(
        yahoo.clone(),
        Duration::from_secs(config.history_cache_ttl_secs),
        store.clone(),
    ));

    // News providers: Yahoo always, keyed providers when configured
    let mut news: Vec<Arc<dyn NewsSource>> = vec![yahoo.clone() as Arc<dyn NewsSource>];
    if let Some(ref api_key) = config.finnhub_api_key {
        info!("Finnhub API key found, enabling company news");
        news.push(Arc::new(FinnhubNewsClient::new(api_key.clone(), timeout)));
    }
    if let Some(ref api_key) = config.newsapi_key {
        info!("NewsAPI key found, enabling NewsAPI headlines");
        news.push(Arc::new(NewsApiClient::new(api_key.clone(), timeout)));
    }
    let social: Vec<Arc<dyn SocialSource>> = vec![
        Arc::new(StockTwitsClient::new(timeout)) as Arc<dyn SocialSource>,
        Arc::new(RedditClient::new(timeout)),
    ];
    let sentiment = Arc::new(SentimentAggregator::new(news, social));

    let registry = Arc::new(ModelRegistry::open(config.model_path.clone()));
    if registry.is_trained() {
        info!("Loaded surge classifier from {}", config.model_path.display());
    }

    let engine = SurgeEngine::new(market.clone(), sentiment, registry, config.max_workers);
    let candidates = Arc::new(CandidateService::new(yahoo));
    let scan = Arc::new(ScanService::new(
        engine.clone(),
        candidates,
        store,
        config.default_workers,
    ));

    // Drop stale histories in the background
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            market.purge_expired();
        }
    });

    let state = AppState {
        config: config.clone(),
        engine,
        scan,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

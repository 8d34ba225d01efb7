pub mod combiner;


pub use combiner::combine;

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use ranker_core::{
    AnalysisResult, EngineError, NewsArticle, NewsDataSource, PriceBar, PriceDataSource,
    Recommendation, TickerUniverse,
};
use sentiment_ensemble::SentimentEnsemble;
use technical_engine::TechnicalEngine;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Daily recommendations keep only results strictly above this score.
const SCORE_FLOOR: f64 = 0.5;

/// Upper bound on the daily recommendation list.
const MAX_DAILY_RECOMMENDATIONS: usize = 20;

const CACHE_TTL_SECS: i64 = 300; // 5 minutes

/// Tunables injected at construction. The scoring formulas themselves are
/// fixed; only data windows and batch parallelism are configurable.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub price_lookback_days: u32,
    pub news_lookback_days: u32,
    /// Bound on in-flight per-ticker analyses during a batch.
    pub concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            price_lookback_days: 30,
            news_lookback_days: 7,
            concurrency: 5,
        }
    }
}

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Per-ticker analysis and batch ranking over injected data sources.
///
/// Each ticker's analysis is a pure function of its own fetched snapshot;
/// the engine shares no mutable state across tickers beyond the TTL
/// caches, so batches fan out behind an `Arc`.
pub struct RecommendationEngine {
    prices: Arc<dyn PriceDataSource>,
    news: Arc<dyn NewsDataSource>,
    universe: Arc<dyn TickerUniverse>,
    technical: TechnicalEngine,
    sentiment: SentimentEnsemble,
    config: EngineConfig,
    price_cache: DashMap<String, CacheEntry<Vec<PriceBar>>>,
    news_cache: DashMap<String, CacheEntry<Vec<NewsArticle>>>,
}

impl RecommendationEngine {
    pub fn new(
        prices: Arc<dyn PriceDataSource>,
        news: Arc<dyn NewsDataSource>,
        universe: Arc<dyn TickerUniverse>,
        sentiment: SentimentEnsemble,
        config: EngineConfig,
    ) -> Self {
        Self {
            prices,
            news,
            universe,
            technical: TechnicalEngine::new(),
            sentiment,
            config,
            price_cache: DashMap::new(),
            news_cache: DashMap::new(),
        }
    }

    /// Get the price series for a ticker (cached, 5-min TTL). An absent
    /// ticker resolves to an empty series; the indicator engine takes the
    /// neutral path from there.
    async fn get_prices(&self, ticker: &str) -> Result<Vec<PriceBar>, EngineError> {
        let cache_key = format!("{}:{}", ticker, self.config.price_lookback_days);
        if let Some(entry) = self.price_cache.get(&cache_key) {
            let age = (Utc::now() - entry.cached_at).num_seconds();
            if age < CACHE_TTL_SECS {
                return Ok(entry.data.clone());
            }
        }

        let bars = self
            .prices
            .fetch_prices(ticker, self.config.price_lookback_days)
            .await?
            .unwrap_or_default();

        self.price_cache.insert(cache_key, CacheEntry {
            data: bars.clone(),
            cached_at: Utc::now(),
        });

        Ok(bars)
    }

    /// Get news articles for a ticker (cached, 5-min TTL).
    async fn get_news(&self, ticker: &str) -> Result<Vec<NewsArticle>, EngineError> {
        let cache_key = format!("{}:{}", ticker, self.config.news_lookback_days);
        if let Some(entry) = self.news_cache.get(&cache_key) {
            let age = (Utc::now() - entry.cached_at).num_seconds();
            if age < CACHE_TTL_SECS {
                return Ok(entry.data.clone());
            }
        }

        let articles = self
            .news
            .fetch_news(ticker, self.config.news_lookback_days)
            .await?;

        self.news_cache.insert(cache_key, CacheEntry {
            data: articles.clone(),
            cached_at: Utc::now(),
        });

        Ok(articles)
    }

    /// Analyze one ticker end to end.
    ///
    /// Fetch failures surface to the caller; missing or short data does
    /// not (neutral technical path, zero sentiment).
    pub async fn analyze_ticker(&self, ticker: &str) -> Result<AnalysisResult, EngineError> {
        let (bars, articles) = tokio::join!(self.get_prices(ticker), self.get_news(ticker));
        let bars = bars?;
        let articles = articles?;

        tracing::info!(
            ticker,
            bars = bars.len(),
            articles = articles.len(),
            "analyzing ticker"
        );

        let technical = self.technical.analyze(&bars);
        let sentiment = self.sentiment.aggregate(&articles).await;

        Ok(combine(ticker, &technical, &sentiment))
    }

    /// Analyze a batch of tickers with bounded concurrency.
    ///
    /// One bad ticker never aborts the batch: its failure is logged and
    /// the ticker skipped. Results come back sorted by final score
    /// descending (ties broken by ticker for stable output).
    pub async fn analyze_many(self: Arc<Self>, tickers: Vec<String>) -> Vec<AnalysisResult> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for ticker in tickers {
            let engine = Arc::clone(&self);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (ticker, Err(EngineError::Task("semaphore closed".to_string())))
                    }
                };
                let result = engine.analyze_ticker(&ticker).await;
                (ticker, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_ticker, Ok(result))) => results.push(result),
                Ok((ticker, Err(e))) => {
                    tracing::warn!("analysis failed for {}: {}", ticker, e);
                }
                Err(e) => {
                    tracing::error!("analysis task error: {}", e);
                }
            }
        }

        results.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });

        results
    }

    /// Rank the whole universe and keep the day's top recommendations.
    ///
    /// Only results scoring above the floor survive; the list is truncated
    /// to the highest-scoring twenty and stamped with `date` (or today).
    pub async fn daily_recommendations(
        self: Arc<Self>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Recommendation>, EngineError> {
        let tickers = self.universe.tickers().await?;
        let date = date.unwrap_or_else(|| Utc::now().date_naive());

        tracing::info!(universe = tickers.len(), %date, "building daily recommendations");

        let results = Arc::clone(&self).analyze_many(tickers).await;

        let recommendations: Vec<Recommendation> = results
            .into_iter()
            .filter(|r| r.final_score > SCORE_FLOOR)
            .take(MAX_DAILY_RECOMMENDATIONS)
            .map(|r| r.into_recommendation(date))
            .collect();

        tracing::info!(kept = recommendations.len(), "daily recommendations ready");

        Ok(recommendations)
    }
}

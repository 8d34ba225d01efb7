use crate::{EngineError, NewsArticle, PriceBar};
use async_trait::async_trait;

/// Read capability for historical price data.
///
/// Implementations return bars in ascending date order, capped to the
/// lookback window, and `None` when the ticker or its data does not exist.
#[async_trait]
pub trait PriceDataSource: Send + Sync {
    async fn fetch_prices(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<Option<Vec<PriceBar>>, EngineError>;
}

/// Read capability for news articles.
///
/// Implementations return articles most-recent-first within the lookback
/// window; an empty vec when none exist.
#[async_trait]
pub trait NewsDataSource: Send + Sync {
    async fn fetch_news(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<Vec<NewsArticle>, EngineError>;
}

/// Read capability for the set of tickers the daily batch iterates over.
#[async_trait]
pub trait TickerUniverse: Send + Sync {
    async fn tickers(&self) -> Result<Vec<String>, EngineError>;
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// News article attached to a ticker. Sequences are ordered
/// most-recent-first by `published_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub headline: String,
    #[serde(default)]
    pub content: Option<String>,
    pub published_at: DateTime<Utc>,
    pub ticker: String,
}

impl NewsArticle {
    /// Headline plus body, the text unit the sentiment ensemble scores.
    pub fn full_text(&self) -> String {
        match &self.content {
            Some(body) => format!("{} {}", self.headline, body),
            None => self.headline.clone(),
        }
    }
}

/// Discrete recommendation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Hold,
    Sell,
}

impl Action {
    /// Map a final score in [0,1] onto the fixed label boundaries.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            Action::Buy
        } else if score >= 0.4 {
            Action::Hold
        } else {
            Action::Sell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Hold => "HOLD",
            Action::Sell => "SELL",
        }
    }
}

/// One sentiment analyzer's verdict on one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    /// Polarity in [-1, 1].
    pub sentiment: f64,
    /// Trust in the polarity, in [0, 1].
    pub confidence: f64,
}

impl SentimentReading {
    pub fn new(sentiment: f64, confidence: f64) -> Self {
        Self { sentiment, confidence }
    }

    /// The reading of an unavailable source or an unusable text.
    pub fn zero() -> Self {
        Self { sentiment: 0.0, confidence: 0.0 }
    }
}

/// Recency-weighted sentiment aggregate over a ticker's news window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewsSentiment {
    pub sentiment: f64,
    pub confidence: f64,
    pub article_count: usize,
}

impl NewsSentiment {
    /// Aggregate for a ticker with no news in the window.
    pub fn empty() -> Self {
        Self { sentiment: 0.0, confidence: 0.0, article_count: 0 }
    }
}

/// Sub-scores produced by the technical indicator engine, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub momentum_score: f64,
    pub volume_score: f64,
    pub technical_score: f64,
}

impl TechnicalSnapshot {
    /// The fallback for a series too short to score (< 20 bars).
    pub fn neutral() -> Self {
        Self { momentum_score: 0.5, volume_score: 0.5, technical_score: 0.5 }
    }
}

/// Full per-ticker analysis output. Built once by the combiner and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ticker: String,
    pub momentum_score: f64,
    pub sentiment_score: f64,
    pub volume_score: f64,
    pub technical_score: f64,
    pub final_score: f64,
    pub recommendation: Action,
    pub reason: String,
}

impl AnalysisResult {
    /// Stamp the result with a recommendation date for persistence handoff.
    pub fn into_recommendation(self, date: NaiveDate) -> Recommendation {
        Recommendation {
            ticker: self.ticker,
            score: self.final_score,
            reason: self.reason,
            momentum_score: self.momentum_score,
            sentiment_score: self.sentiment_score,
            volume_score: self.volume_score,
            technical_score: self.technical_score,
            recommended_date: date,
        }
    }
}

/// Date-stamped recommendation record, the unit handed to the persistence
/// collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub ticker: String,
    pub score: f64,
    pub reason: String,
    pub momentum_score: f64,
    pub sentiment_score: f64,
    pub volume_score: f64,
    pub technical_score: f64,
    pub recommended_date: NaiveDate,
}

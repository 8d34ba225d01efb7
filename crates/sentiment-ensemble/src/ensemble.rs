use std::sync::Arc;

use finbert_client::FinbertClient;
use ranker_core::stats::{recency_weights, weighted_mean};
use ranker_core::{NewsArticle, NewsSentiment, SentimentReading};

use crate::sources::{CompoundSource, FinbertSource, PolaritySource, SentimentSource};

/// Fixed fusion weights: domain model, polarity lexicon, compound lexicon.
/// The domain model dominates but never fully displaces the fallbacks.
pub const ENSEMBLE_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Texts shorter than this (after trim) carry too little signal to trust
/// any analyzer.
const MIN_TEXT_CHARS: usize = 10;

/// Per-text ensemble output with the per-source breakdown kept for
/// observability.
#[derive(Debug, Clone, Copy)]
pub struct TextSentiment {
    pub sentiment: f64,
    pub confidence: f64,
    pub model: SentimentReading,
    pub polarity: SentimentReading,
    pub compound: SentimentReading,
}

impl TextSentiment {
    fn zero() -> Self {
        Self {
            sentiment: 0.0,
            confidence: 0.0,
            model: SentimentReading::zero(),
            polarity: SentimentReading::zero(),
            compound: SentimentReading::zero(),
        }
    }
}

/// Three-analyzer sentiment ensemble with fixed-weight fusion and
/// recency-weighted aggregation across a ticker's news window.
///
/// Stateless at inference time; safe to share behind `Arc` across
/// concurrent analysis tasks.
pub struct SentimentEnsemble {
    model: Arc<dyn SentimentSource>,
    polarity: Arc<dyn SentimentSource>,
    compound: Arc<dyn SentimentSource>,
}

impl SentimentEnsemble {
    /// Standard ensemble: remote classifier (when configured) plus the two
    /// lexicon fallbacks.
    pub fn new(model_client: Option<FinbertClient>) -> Self {
        Self {
            model: Arc::new(FinbertSource::new(model_client)),
            polarity: Arc::new(PolaritySource),
            compound: Arc::new(CompoundSource),
        }
    }

    /// Ensemble over caller-provided sources, fused with the same fixed
    /// weights.
    pub fn with_sources(
        model: Arc<dyn SentimentSource>,
        polarity: Arc<dyn SentimentSource>,
        compound: Arc<dyn SentimentSource>,
    ) -> Self {
        Self { model, polarity, compound }
    }

    /// Score one text through all three sources and fuse.
    pub async fn score_text(&self, text: &str) -> TextSentiment {
        if text.trim().chars().count() < MIN_TEXT_CHARS {
            return TextSentiment::zero();
        }

        let (model, polarity, compound) = tokio::join!(
            self.model.score(text),
            self.polarity.score(text),
            self.compound.score(text),
        );

        let sentiments = [model.sentiment, polarity.sentiment, compound.sentiment];
        let confidences = [model.confidence, polarity.confidence, compound.confidence];

        TextSentiment {
            sentiment: weighted_mean(&sentiments, &ENSEMBLE_WEIGHTS).clamp(-1.0, 1.0),
            confidence: weighted_mean(&confidences, &ENSEMBLE_WEIGHTS).clamp(0.0, 1.0),
            model,
            polarity,
            compound,
        }
    }

    /// Aggregate sentiment over a ticker's articles, most-recent-first,
    /// with exponentially decaying recency weights.
    pub async fn aggregate(&self, articles: &[NewsArticle]) -> NewsSentiment {
        if articles.is_empty() {
            return NewsSentiment::empty();
        }

        let mut sentiments = Vec::with_capacity(articles.len());
        let mut confidences = Vec::with_capacity(articles.len());
        for article in articles {
            let scored = self.score_text(&article.full_text()).await;
            sentiments.push(scored.sentiment);
            confidences.push(scored.confidence);
        }

        let weights = recency_weights(articles.len());

        NewsSentiment {
            sentiment: weighted_mean(&sentiments, &weights),
            confidence: weighted_mean(&confidences, &weights),
            article_count: articles.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    struct FixedSource(f64, f64);

    #[async_trait]
    impl SentimentSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn score(&self, _text: &str) -> SentimentReading {
            SentimentReading::new(self.0, self.1)
        }
    }

    fn fixed_ensemble(model: (f64, f64), polarity: (f64, f64), compound: (f64, f64)) -> SentimentEnsemble {
        SentimentEnsemble::with_sources(
            Arc::new(FixedSource(model.0, model.1)),
            Arc::new(FixedSource(polarity.0, polarity.1)),
            Arc::new(FixedSource(compound.0, compound.1)),
        )
    }

    fn article(hours_ago: i64, headline: &str) -> NewsArticle {
        NewsArticle {
            headline: headline.to_string(),
            content: None,
            published_at: Utc::now() - Duration::hours(hours_ago),
            ticker: "TEST".to_string(),
        }
    }

    #[test]
    fn fusion_weights_sum_to_one() {
        let sum: f64 = ENSEMBLE_WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn short_text_skips_the_sources() {
        let ensemble = fixed_ensemble((0.9, 0.9), (0.8, 0.8), (0.7, 0.7));
        let scored = ensemble.score_text("  tiny  ").await;
        assert_eq!(scored.sentiment, 0.0);
        assert_eq!(scored.confidence, 0.0);
    }

    #[tokio::test]
    async fn fusion_is_the_fixed_weighted_mean() {
        let ensemble = fixed_ensemble((0.8, 0.9), (0.4, 0.6), (-0.2, 0.3));
        let scored = ensemble.score_text("long enough text to score").await;

        let expected_sentiment = 0.8 * 0.5 + 0.4 * 0.3 + (-0.2) * 0.2;
        let expected_confidence = 0.9 * 0.5 + 0.6 * 0.3 + 0.3 * 0.2;
        assert!((scored.sentiment - expected_sentiment).abs() < 1e-12);
        assert!((scored.confidence - expected_confidence).abs() < 1e-12);
    }

    #[tokio::test]
    async fn unavailable_model_contributes_zero_at_fixed_weight() {
        let ensemble = fixed_ensemble((0.0, 0.0), (0.6, 0.7), (0.4, 0.4));
        let scored = ensemble.score_text("long enough text to score").await;

        // Zero vector at weight 0.5, not a renormalized two-source mean.
        let expected_sentiment = 0.6 * 0.3 + 0.4 * 0.2;
        let expected_confidence = 0.7 * 0.3 + 0.4 * 0.2;
        assert!((scored.sentiment - expected_sentiment).abs() < 1e-12);
        assert!((scored.confidence - expected_confidence).abs() < 1e-12);
    }

    #[tokio::test]
    async fn fused_outputs_are_clamped() {
        let ensemble = fixed_ensemble((1.0, 1.0), (1.0, 1.0), (1.0, 1.0));
        let scored = ensemble.score_text("long enough text to score").await;
        assert!(scored.sentiment <= 1.0);
        assert!(scored.confidence <= 1.0);
    }

    #[tokio::test]
    async fn empty_news_aggregates_to_zero() {
        let ensemble = fixed_ensemble((0.9, 0.9), (0.9, 0.9), (0.9, 0.9));
        let aggregate = ensemble.aggregate(&[]).await;
        assert_eq!(aggregate.sentiment, 0.0);
        assert_eq!(aggregate.confidence, 0.0);
        assert_eq!(aggregate.article_count, 0);
    }

    #[tokio::test]
    async fn uniformly_positive_news_crosses_the_positive_band() {
        let ensemble = fixed_ensemble((0.9, 0.9), (0.7, 0.8), (0.8, 0.8));
        let articles: Vec<NewsArticle> = (0..5)
            .map(|i| article(i * 12, "Company reports record quarterly earnings"))
            .collect();
        let aggregate = ensemble.aggregate(&articles).await;
        assert!(aggregate.sentiment > 0.3);
        assert_eq!(aggregate.article_count, 5);
    }

    #[tokio::test]
    async fn aggregation_weights_recent_articles_more() {
        struct Alternating;

        #[async_trait]
        impl SentimentSource for Alternating {
            fn name(&self) -> &'static str {
                "alternating"
            }

            async fn score(&self, text: &str) -> SentimentReading {
                if text.contains("upbeat") {
                    SentimentReading::new(1.0, 1.0)
                } else {
                    SentimentReading::new(-1.0, 1.0)
                }
            }
        }

        let source = Arc::new(Alternating);
        let ensemble =
            SentimentEnsemble::with_sources(source.clone(), source.clone(), source);

        // Newest article is upbeat, oldest is not; recency decay must tip
        // the balance positive.
        let articles = vec![
            article(1, "upbeat quarterly report arrives"),
            article(48, "gloomy quarterly report arrives"),
        ];
        let aggregate = ensemble.aggregate(&articles).await;
        assert!(aggregate.sentiment > 0.0);
    }
}

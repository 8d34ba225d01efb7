use async_trait::async_trait;
use finbert_client::FinbertClient;
use ranker_core::SentimentReading;

use crate::lexicon;

/// Negated sentiment terms flip sign and lose intensity.
const NEGATION_SCALAR: f64 = -0.74;

/// Squashing constant for the compound normalization s / sqrt(s^2 + alpha).
const COMPOUND_ALPHA: f64 = 15.0;

/// One member of the sentiment ensemble.
///
/// A source never fails: an unavailable backend contributes the zero
/// reading at its fixed fusion weight, so an outage degrades quality, not
/// availability.
#[async_trait]
pub trait SentimentSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn score(&self, text: &str) -> SentimentReading;
}

/// Financial-domain classifier served out-of-process.
///
/// The 3-way probability distribution collapses to
/// `sentiment = P(positive) - P(negative)`; confidence is the winning
/// class probability.
pub struct FinbertSource {
    client: Option<FinbertClient>,
}

impl FinbertSource {
    pub fn new(client: Option<FinbertClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SentimentSource for FinbertSource {
    fn name(&self) -> &'static str {
        "finbert"
    }

    async fn score(&self, text: &str) -> SentimentReading {
        let Some(client) = &self.client else {
            return SentimentReading::zero();
        };

        match client.predict(vec![text.to_string()]).await {
            Ok(response) => match response.predictions.first() {
                Some(p) => SentimentReading::new(
                    (p.positive - p.negative).clamp(-1.0, 1.0),
                    p.negative.max(p.neutral).max(p.positive).clamp(0.0, 1.0),
                ),
                None => SentimentReading::zero(),
            },
            Err(e) => {
                tracing::debug!("sentiment model unavailable, degrading ensemble: {e}");
                SentimentReading::zero()
            }
        }
    }
}

/// Polarity/subjectivity lexicon source.
///
/// Matched entries are averaged: `sentiment` is the mean valence scaled to
/// [-1, 1], and confidence rewards strong polarity on objective language:
/// `|polarity| + (1 - subjectivity) / 2`.
pub struct PolaritySource;

#[async_trait]
impl SentimentSource for PolaritySource {
    fn name(&self) -> &'static str {
        "polarity"
    }

    async fn score(&self, text: &str) -> SentimentReading {
        let lower = text.to_lowercase();
        let words = lexicon::tokenize(&lower);

        let mut valence_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut matches = 0usize;
        for word in &words {
            if let Some((valence, subjectivity)) = lexicon::entry(word) {
                valence_sum += valence / 4.0;
                subjectivity_sum += subjectivity;
                matches += 1;
            }
        }

        let (polarity, subjectivity) = if matches > 0 {
            (valence_sum / matches as f64, subjectivity_sum / matches as f64)
        } else {
            (0.0, 0.0)
        };

        let confidence = polarity.abs() + (1.0 - subjectivity) / 2.0;
        SentimentReading::new(polarity.clamp(-1.0, 1.0), confidence.clamp(0.0, 1.0))
    }
}

/// Rule-based compound lexicon source.
///
/// Valences are summed with a negation window, then squashed to [-1, 1]
/// via `s / sqrt(s^2 + alpha)`; confidence is the compound magnitude.
pub struct CompoundSource;

#[async_trait]
impl SentimentSource for CompoundSource {
    fn name(&self) -> &'static str {
        "compound"
    }

    async fn score(&self, text: &str) -> SentimentReading {
        let lower = text.to_lowercase();
        let words = lexicon::tokenize(&lower);

        let negation_positions: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| lexicon::is_negation(w))
            .map(|(i, _)| i)
            .collect();

        let mut total = 0.0;
        for (i, word) in words.iter().enumerate() {
            let Some((valence, _)) = lexicon::entry(word) else {
                continue;
            };

            let negated = negation_positions
                .iter()
                .any(|&pos| pos < i && (i - pos) <= lexicon::NEGATION_WINDOW);

            total += if negated { valence * NEGATION_SCALAR } else { valence };
        }

        let compound = total / (total * total + COMPOUND_ALPHA).sqrt();
        SentimentReading::new(compound, compound.abs())
    }
}

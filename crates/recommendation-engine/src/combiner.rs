use ranker_core::{Action, AnalysisResult, NewsSentiment, TechnicalSnapshot};

const WEIGHT_MOMENTUM: f64 = 0.3;
const WEIGHT_SENTIMENT: f64 = 0.4;
const WEIGHT_VOLUME: f64 = 0.2;
const WEIGHT_TECHNICAL: f64 = 0.1;

/// Merge the technical and sentiment sub-scores into the final record.
///
/// The sentiment term enters on its [-1, 1] scale against three [0, 1]
/// terms; the single affine remap afterwards assumes sentiment is the
/// dominant-magnitude term. Kept as-is for compatibility with the scores
/// this engine has always produced.
pub fn combine(ticker: &str, technical: &TechnicalSnapshot, sentiment: &NewsSentiment) -> AnalysisResult {
    let raw = technical.momentum_score * WEIGHT_MOMENTUM
        + sentiment.sentiment * WEIGHT_SENTIMENT
        + technical.volume_score * WEIGHT_VOLUME
        + technical.technical_score * WEIGHT_TECHNICAL;

    let final_score = ((raw + 1.0) / 2.0).clamp(0.0, 1.0);

    let reason = generate_reason(
        technical.momentum_score,
        sentiment.sentiment,
        technical.volume_score,
        technical.technical_score,
        final_score,
    );

    AnalysisResult {
        ticker: ticker.to_string(),
        momentum_score: technical.momentum_score,
        sentiment_score: sentiment.sentiment,
        volume_score: technical.volume_score,
        technical_score: technical.technical_score,
        final_score,
        recommendation: Action::from_score(final_score),
        reason,
    }
}

/// Deterministic, data-driven rationale: each sub-score is checked against
/// its fixed bands, in momentum, sentiment, volume, technical order.
fn generate_reason(momentum: f64, sentiment: f64, volume: f64, technical: f64, final_score: f64) -> String {
    let mut phrases: Vec<&str> = Vec::new();

    if momentum > 0.7 {
        phrases.push("strong upward momentum");
    } else if momentum < 0.3 {
        phrases.push("downward momentum");
    }

    if sentiment > 0.3 {
        phrases.push("positive news sentiment");
    } else if sentiment < -0.3 {
        phrases.push("negative news sentiment");
    }

    if volume > 0.7 {
        phrases.push("volume surge");
    } else if volume < 0.3 {
        phrases.push("volume decline");
    }

    if technical > 0.7 {
        phrases.push("healthy technical indicators");
    } else if technical < 0.3 {
        phrases.push("weak technical indicators");
    }

    if phrases.is_empty() {
        phrases.push("broadly neutral signals");
    }

    format!("Overall score {:.1}%: {}", final_score * 100.0, phrases.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(momentum: f64, volume: f64, technical: f64) -> TechnicalSnapshot {
        TechnicalSnapshot {
            momentum_score: momentum,
            volume_score: volume,
            technical_score: technical,
        }
    }

    fn news(sentiment: f64) -> NewsSentiment {
        NewsSentiment {
            sentiment,
            confidence: 0.8,
            article_count: 3,
        }
    }

    #[test]
    fn buy_boundary_is_inclusive() {
        // raw = 0.4 exactly => final = 0.7
        let result = combine("T", &snapshot(0.0, 0.0, 0.0), &news(1.0));
        assert!((result.final_score - 0.7).abs() < 1e-12);
        assert_eq!(result.recommendation, Action::Buy);
    }

    #[test]
    fn hold_boundary_is_inclusive() {
        // raw = -0.2 exactly => final = 0.4
        let result = combine("T", &snapshot(0.0, 0.0, 0.0), &news(-0.5));
        assert!((result.final_score - 0.4).abs() < 1e-12);
        assert_eq!(result.recommendation, Action::Hold);
    }

    #[test]
    fn below_hold_boundary_is_sell() {
        let result = combine("T", &snapshot(0.0, 0.0, 0.0), &news(-0.525));
        assert!(result.final_score < 0.4);
        assert_eq!(result.recommendation, Action::Sell);
    }

    #[test]
    fn final_score_stays_in_unit_interval() {
        let extremes = [
            (snapshot(1.0, 1.0, 1.0), news(1.0)),
            (snapshot(0.0, 0.0, 0.0), news(-1.0)),
            (snapshot(0.5, 0.5, 0.5), news(0.0)),
        ];
        for (tech, sent) in &extremes {
            let result = combine("T", tech, sent);
            assert!((0.0..=1.0).contains(&result.final_score));
        }
    }

    #[test]
    fn sub_scores_are_carried_through_unchanged() {
        let tech = snapshot(0.81, 0.22, 0.64);
        let sent = news(0.35);
        let result = combine("NVDA", &tech, &sent);
        assert_eq!(result.ticker, "NVDA");
        assert_eq!(result.momentum_score, 0.81);
        assert_eq!(result.sentiment_score, 0.35);
        assert_eq!(result.volume_score, 0.22);
        assert_eq!(result.technical_score, 0.64);
    }

    #[test]
    fn reason_phrases_follow_band_order() {
        let result = combine("T", &snapshot(0.9, 0.8, 0.1), &news(0.5));
        let reason = &result.reason;

        let momentum_at = reason.find("strong upward momentum").unwrap();
        let sentiment_at = reason.find("positive news sentiment").unwrap();
        let volume_at = reason.find("volume surge").unwrap();
        let technical_at = reason.find("weak technical indicators").unwrap();
        assert!(momentum_at < sentiment_at);
        assert!(sentiment_at < volume_at);
        assert!(volume_at < technical_at);
    }

    #[test]
    fn negative_bands_trigger_their_phrases() {
        let result = combine("T", &snapshot(0.1, 0.2, 0.8), &news(-0.6));
        assert!(result.reason.contains("downward momentum"));
        assert!(result.reason.contains("negative news sentiment"));
        assert!(result.reason.contains("volume decline"));
        assert!(result.reason.contains("healthy technical indicators"));
    }

    #[test]
    fn neutral_inputs_emit_the_default_phrase() {
        let result = combine("T", &snapshot(0.5, 0.5, 0.5), &news(0.0));
        assert!(result.reason.contains("broadly neutral signals"));
        assert!(result.reason.starts_with("Overall score "));
    }

    #[test]
    fn reason_includes_percentage() {
        let result = combine("T", &snapshot(0.0, 0.0, 0.0), &news(1.0));
        assert!(result.reason.contains("70.0%"), "reason: {}", result.reason);
    }
}

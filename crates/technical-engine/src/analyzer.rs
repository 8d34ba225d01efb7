use ranker_core::stats::{pct_change, pearson, weighted_mean};
use ranker_core::{PriceBar, TechnicalSnapshot};
use serde::{Deserialize, Serialize};

use crate::indicators::*;

/// Minimum bars for any indicator work; below this the whole engine takes
/// the neutral-default path.
pub const MIN_BARS: usize = 20;

const MOMENTUM_WINDOW: usize = 20;
const SMA_SHORT: usize = 5;
const VOLUME_WINDOW: usize = 20;

const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const BB_PERIOD: usize = 20;
const BB_STD: f64 = 2.0;
const STOCH_PERIOD: usize = 14;
const WILLIAMS_PERIOD: usize = 14;

/// Fixed composite weights: RSI, MACD, Bollinger, Stochastic, Williams %R.
const INDICATOR_WEIGHTS: [f64; 5] = [0.30, 0.25, 0.20, 0.15, 0.10];

/// Raw indicator values at the latest bar, after neutral-default
/// substitution for anything undefined (insufficient warm-up or a
/// degenerate window).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi: f64,
    pub macd: f64,
    pub bb_position: f64,
    pub stoch_k: f64,
    pub williams_r: f64,
}

impl IndicatorSet {
    pub fn neutral() -> Self {
        Self {
            rsi: 50.0,
            macd: 0.0,
            bb_position: 0.5,
            stoch_k: 50.0,
            williams_r: -50.0,
        }
    }
}

pub struct TechnicalEngine;

impl TechnicalEngine {
    pub fn new() -> Self {
        Self
    }

    /// Momentum score in [0, 1].
    ///
    /// Precondition: at least `MOMENTUM_WINDOW` closes. Callers go through
    /// `analyze`, which routes shorter series to the neutral path instead.
    pub fn momentum_score(&self, closes: &[f64]) -> f64 {
        debug_assert!(closes.len() >= MOMENTUM_WINDOW);

        let last = closes[closes.len() - 1];
        let base = closes[closes.len() - MOMENTUM_WINDOW];
        let roc = (last - base) / base;

        let ma_short = sma(closes, SMA_SHORT);
        let ma_long = sma(closes, MOMENTUM_WINDOW);
        let ma_momentum = match (ma_short.last(), ma_long.last()) {
            (Some(short), Some(long)) => (short - long) / long,
            _ => 0.0,
        };

        let raw = (roc + ma_momentum) / 2.0;
        // Affine map centering a +-0.1 raw momentum band onto [0, 1];
        // anything outside saturates.
        ((raw + 0.1) / 0.2).clamp(0.0, 1.0)
    }

    /// Volume score in [0, 1]: last volume against its 20-day average,
    /// blended with the price/volume percent-change correlation.
    pub fn volume_score(&self, closes: &[f64], volumes: &[f64]) -> f64 {
        if closes.len() < VOLUME_WINDOW || volumes.len() < VOLUME_WINDOW {
            return 0.5;
        }

        let avg_volume = sma(volumes, VOLUME_WINDOW).last().copied().unwrap_or(0.0);
        let current = volumes[volumes.len() - 1];
        let ratio = if avg_volume > 0.0 { current / avg_volume } else { 1.0 };

        let price_changes = pct_change(closes);
        let volume_changes = pct_change(volumes);
        let correlation = pearson(&price_changes, &volume_changes);

        let raw = (ratio + (correlation + 1.0) / 2.0) / 2.0;
        raw.clamp(0.0, 1.0)
    }

    /// Latest indicator values with neutral defaults substituted for
    /// anything the series is too short or too degenerate to define.
    pub fn indicator_set(&self, bars: &[PriceBar]) -> IndicatorSet {
        if bars.len() < MIN_BARS {
            return IndicatorSet::neutral();
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let neutral = IndicatorSet::neutral();

        let rsi_value = rsi(&closes, RSI_PERIOD)
            .last()
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(neutral.rsi);

        // The signal line needs its own warm-up on top of the slow EMA, so
        // the line-minus-signal value is undefined until then.
        let macd_value = if closes.len() >= MACD_SLOW + MACD_SIGNAL {
            macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL)
                .histogram
                .last()
                .copied()
                .filter(|v| v.is_finite())
                .unwrap_or(neutral.macd)
        } else {
            neutral.macd
        };

        let bb = bollinger_bands(&closes, BB_PERIOD, BB_STD);
        let bb_position = match (bb.upper.last(), bb.lower.last()) {
            (Some(upper), Some(lower)) if upper != lower => {
                let pos = (closes[closes.len() - 1] - lower) / (upper - lower);
                if pos.is_finite() { pos } else { neutral.bb_position }
            }
            _ => neutral.bb_position,
        };

        let stoch_value = stochastic_k(bars, STOCH_PERIOD)
            .last()
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(neutral.stoch_k);

        let williams_value = williams_r(bars, WILLIAMS_PERIOD)
            .last()
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(neutral.williams_r);

        IndicatorSet {
            rsi: rsi_value,
            macd: macd_value,
            bb_position,
            stoch_k: stoch_value,
            williams_r: williams_value,
        }
    }

    /// Composite technical score in [0, 1] from the five indicators.
    pub fn technical_score(&self, bars: &[PriceBar]) -> f64 {
        let set = self.indicator_set(bars);

        // Each sub-score peaks at its indicator's neutral point and falls
        // off toward the extremes.
        let rsi_score = 1.0 - (set.rsi - 50.0).abs() / 50.0;
        let macd_score = (0.5 + (set.macd / 0.1) / 2.0).clamp(0.0, 1.0);
        let bb_score = 1.0 - (set.bb_position - 0.5).abs() * 2.0;
        let stoch_score = 1.0 - (set.stoch_k - 50.0).abs() / 50.0;
        let williams_score = 1.0 - (set.williams_r + 50.0).abs() / 50.0;

        let scores = [rsi_score, macd_score, bb_score, stoch_score, williams_score];
        weighted_mean(&scores, &INDICATOR_WEIGHTS).clamp(0.0, 1.0)
    }

    /// Score a price series. Fewer than `MIN_BARS` bars yields the neutral
    /// triple rather than noisy low-sample signals.
    pub fn analyze(&self, bars: &[PriceBar]) -> TechnicalSnapshot {
        if bars.len() < MIN_BARS {
            return TechnicalSnapshot::neutral();
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        TechnicalSnapshot {
            momentum_score: self.momentum_score(&closes),
            volume_score: self.volume_score(&closes, &volumes),
            technical_score: self.technical_score(bars),
        }
    }
}

impl Default for TechnicalEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64, volume: f64) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + chrono::Duration::days(day as i64);
        PriceBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    fn flat_series(n: u32) -> Vec<PriceBar> {
        (0..n).map(|d| bar(d, 100.0, 50_000.0)).collect()
    }

    #[test]
    fn short_series_takes_neutral_path() {
        let engine = TechnicalEngine::new();
        let snapshot = engine.analyze(&flat_series(19));
        assert_eq!(snapshot, TechnicalSnapshot::neutral());

        // Content does not matter below the threshold.
        let mut wild: Vec<PriceBar> = (0..19).map(|d| bar(d, 10.0 + d as f64 * 5.0, 1.0)).collect();
        wild[3].close = 0.01;
        assert_eq!(engine.analyze(&wild), TechnicalSnapshot::neutral());
    }

    #[test]
    fn flat_twenty_bar_series_scores() {
        let engine = TechnicalEngine::new();
        let bars = flat_series(20);
        let snapshot = engine.analyze(&bars);

        // Zero rate-of-change maps to the center of the momentum band.
        assert!((snapshot.momentum_score - 0.5).abs() < 1e-12);

        // Ratio 1.0, correlation guarded to 0 over zero-variance changes.
        assert!((snapshot.volume_score - 0.75).abs() < 1e-12);

        // RSI/BB/Stoch/Williams all undefined-neutral (sub-score 1.0),
        // MACD default 0 (sub-score 0.5):
        // 0.30 + 0.25*0.5 + 0.20 + 0.15 + 0.10 = 0.875
        assert!((snapshot.technical_score - 0.875).abs() < 1e-12);
    }

    #[test]
    fn flat_series_indicators_are_neutral() {
        let engine = TechnicalEngine::new();
        let set = engine.indicator_set(&flat_series(40));
        assert_eq!(set, IndicatorSet::neutral());
    }

    #[test]
    fn strong_uptrend_saturates_momentum() {
        let engine = TechnicalEngine::new();
        let bars: Vec<PriceBar> = (0..30).map(|d| bar(d, 100.0 + 3.0 * d as f64, 50_000.0)).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(engine.momentum_score(&closes), 1.0);
    }

    #[test]
    fn strong_downtrend_floors_momentum() {
        let engine = TechnicalEngine::new();
        let bars: Vec<PriceBar> = (0..30).map(|d| bar(d, 200.0 - 3.0 * d as f64, 50_000.0)).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(engine.momentum_score(&closes), 0.0);
    }

    #[test]
    fn volume_spike_lifts_volume_score() {
        let engine = TechnicalEngine::new();
        let mut bars = flat_series(25);
        let calm = engine.analyze(&bars);

        let last = bars.len() - 1;
        bars[last].volume = 500_000.0;
        let spiked = engine.analyze(&bars);
        assert!(spiked.volume_score > calm.volume_score);
        assert!(spiked.volume_score <= 1.0);
    }

    #[test]
    fn zero_average_volume_defaults_ratio() {
        let engine = TechnicalEngine::new();
        let bars: Vec<PriceBar> = (0..20).map(|d| bar(d, 100.0, 0.0)).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        // ratio defaults to 1.0, correlation guarded to 0
        assert!((engine.volume_score(&closes, &volumes) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn macd_stays_neutral_before_signal_warmup() {
        let engine = TechnicalEngine::new();
        // 34 bars: slow EMA exists but the signal line warm-up does not.
        let bars: Vec<PriceBar> = (0..34).map(|d| bar(d, 100.0 + d as f64, 50_000.0)).collect();
        let set = engine.indicator_set(&bars);
        assert_eq!(set.macd, 0.0);

        let bars: Vec<PriceBar> = (0..40).map(|d| bar(d, 100.0 + d as f64, 50_000.0)).collect();
        let set = engine.indicator_set(&bars);
        assert!(set.macd != 0.0);
    }

    #[test]
    fn sub_scores_stay_in_unit_interval() {
        let engine = TechnicalEngine::new();
        let bars: Vec<PriceBar> = (0..60)
            .map(|d| {
                let close = 100.0 + (d as f64 * 0.7).sin() * 15.0;
                let mut b = bar(d, close, 40_000.0 + (d as f64 * 1.3).cos().abs() * 30_000.0);
                b.high = close + 2.0;
                b.low = close - 2.0;
                b
            })
            .collect();
        let snapshot = engine.analyze(&bars);
        for score in [snapshot.momentum_score, snapshot.volume_score, snapshot.technical_score] {
            assert!((0.0..=1.0).contains(&score), "score out of range: {score}");
        }
    }

    #[test]
    fn analyze_is_deterministic() {
        let engine = TechnicalEngine::new();
        let bars: Vec<PriceBar> = (0..45)
            .map(|d| bar(d, 100.0 + (d as f64 * 1.1).sin() * 8.0, 60_000.0 + d as f64 * 100.0))
            .collect();
        let first = engine.analyze(&bars);
        let second = engine.analyze(&bars);
        assert_eq!(first, second);
    }
}

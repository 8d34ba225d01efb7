use ranker_core::PriceBar;

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Exponential Moving Average
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.is_empty() {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len());
    let multiplier = 2.0 / (period as f64 + 1.0);

    // Start with SMA for first value
    if data.len() < period {
        return vec![data.iter().sum::<f64>() / data.len() as f64];
    }

    let sma: f64 = data[..period].iter().sum::<f64>() / period as f64;
    result.push(sma);

    for i in 1..data.len() {
        let ema_val = (data[i] - result[i - 1]) * multiplier + result[i - 1];
        result.push(ema_val);
    }

    result
}

/// Relative Strength Index.
///
/// A window with zero average gain *and* zero average loss has no defined
/// strength ratio; the value comes out NaN and the caller substitutes the
/// neutral default. A pure-gain window tends to 100 through the same
/// arithmetic.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let mut gains = Vec::new();
    let mut losses = Vec::new();

    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let mut rsi_values = Vec::with_capacity(data.len() - period);
    rsi_values.push(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;

        let rs = avg_gain / avg_loss;
        rsi_values.push(100.0 - (100.0 / (1.0 + rs)));
    }

    rsi_values
}

/// MACD (Moving Average Convergence Divergence)
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(data: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> MacdResult {
    if fast_period == 0
        || slow_period == 0
        || signal_period == 0
        || slow_period < fast_period
        || data.len() < slow_period
    {
        return MacdResult { macd_line: vec![], signal_line: vec![], histogram: vec![] };
    }

    let ema_fast = ema(data, fast_period);
    let ema_slow = ema(data, slow_period);

    let offset = slow_period - fast_period;
    let mut macd_line = Vec::new();

    for i in offset..ema_fast.len() {
        macd_line.push(ema_fast[i] - ema_slow[i - offset]);
    }

    let signal_line = ema(&macd_line, signal_period);

    let mut histogram = Vec::new();
    let hist_offset = macd_line.len().saturating_sub(signal_line.len());
    for i in 0..signal_line.len() {
        histogram.push(macd_line[i + hist_offset] - signal_line[i]);
    }

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Bollinger Bands
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    if period == 0 || data.len() < period {
        return BollingerBands { upper: vec![], middle: vec![], lower: vec![] };
    }

    let middle = sma(data, period);
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for i in period - 1..data.len() {
        let slice = &data[i + 1 - period..=i];
        let mean = middle[i + 1 - period];
        let variance: f64 = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std = variance.sqrt();

        upper.push(mean + std_dev * std);
        lower.push(mean - std_dev * std);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Stochastic Oscillator %K.
///
/// Position of each close within the rolling high-low range, 0-100. A flat
/// range has no defined position; the value comes out NaN and the caller
/// substitutes the neutral default.
pub fn stochastic_k(bars: &[PriceBar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < period {
        return vec![];
    }

    let mut k_values = Vec::with_capacity(bars.len() - period + 1);

    for i in period - 1..bars.len() {
        let slice = &bars[i + 1 - period..=i];
        let highest = slice.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = slice.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        k_values.push(100.0 * (bars[i].close - lowest) / (highest - lowest));
    }

    k_values
}

/// Williams %R.
///
/// Inverse-scaled stochastic variant, -100 to 0. Undefined (NaN) over a
/// flat high-low range, like `stochastic_k`.
pub fn williams_r(bars: &[PriceBar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < period {
        return vec![];
    }

    let mut r_values = Vec::with_capacity(bars.len() - period + 1);

    for i in period - 1..bars.len() {
        let slice = &bars[i + 1 - period..=i];
        let highest = slice.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = slice.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        r_values.push(-100.0 * (highest - bars[i].close) / (highest - lowest));
    }

    r_values
}

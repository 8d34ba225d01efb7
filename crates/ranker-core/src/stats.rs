/// Scoring statistics shared by the engines.
///
/// Every function guards its own degenerate inputs (empty slices, zero
/// variance, mismatched lengths) and resolves them to the documented
/// neutral value instead of erroring.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Weighted mean over a unit (or otherwise fixed) weight sum.
///
/// The divisor is the weight sum itself, so callers that pass weights
/// summing to 1 get a plain convex combination. Returns 0.0 when the
/// weight sum is zero or the lengths differ.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    if values.len() != weights.len() {
        return 0.0;
    }
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum == 0.0 {
        return 0.0;
    }
    let total: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    total / weight_sum
}

/// Day-over-day percent changes of a series.
///
/// Output has one fewer element than the input; an empty or single-element
/// input yields an empty vec.
pub fn pct_change(data: &[f64]) -> Vec<f64> {
    data.windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Pearson correlation of two equally long series.
///
/// Returns 0.0 when the correlation is undefined: fewer than 2
/// observations, mismatched lengths, or zero variance in either series.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }
    let mx = mean(x);
    let my = mean(y);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() {
        r
    } else {
        // Non-finite observations (e.g. a percent change over a zero base)
        // make the correlation undefined.
        0.0
    }
}

/// Recency weights for `n` items ordered most-recent-first.
///
/// Exponential decay from 1 at the newest item to e^-1 at the oldest,
/// normalized to unit sum. Monotonically non-increasing.
pub fn recency_weights(n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![];
    }
    if n == 1 {
        return vec![1.0];
    }
    let raw: Vec<f64> = (0..n)
        .map(|i| (-(i as f64) / (n as f64 - 1.0)).exp())
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

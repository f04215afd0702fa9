//! Window helpers shared by the built-in indicators.
//!
//! `f64::max`/`f64::min` and ordered comparisons silently skip NaN. The
//! helpers here return NaN (or `None`) instead, so an undefined sample never
//! disappears from a window.

/// Rolling sums over `period`-sized windows.
///
/// Element `k` is the sum of `values[k..k + period]`; the result has
/// `values.len() - period + 1` elements (empty if the input is shorter).
/// A running sum is kept and rescanned when a NaN enters or leaves the window,
/// so values after a NaN has left the window are exact again.
pub fn rolling_sum(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if period == 0 || n < period {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(n - period + 1);
    let mut sum: f64 = values[..period].iter().sum();
    let mut nan_in_window = sum.is_nan();
    result.push(sum);

    for i in period..n {
        let leaving = values[i - period];
        let entering = values[i];
        if nan_in_window || leaving.is_nan() || entering.is_nan() || sum.is_infinite() {
            sum = values[i + 1 - period..=i].iter().sum();
            nan_in_window = sum.is_nan();
        } else {
            sum += entering - leaving;
        }
        result.push(sum);
    }

    result
}

/// Largest value, or NaN if the window holds a NaN or is empty.
pub fn window_max(window: &[f64]) -> f64 {
    let mut iter = window.iter();
    let Some(&first) = iter.next() else {
        return f64::NAN;
    };
    iter.try_fold(first, |m, &v| {
        if v.is_nan() {
            None
        } else if v > m {
            Some(v)
        } else {
            Some(m)
        }
    })
    .filter(|m| !m.is_nan())
    .unwrap_or(f64::NAN)
}

/// Smallest value, or NaN if the window holds a NaN or is empty.
pub fn window_min(window: &[f64]) -> f64 {
    let mut iter = window.iter();
    let Some(&first) = iter.next() else {
        return f64::NAN;
    };
    iter.try_fold(first, |m, &v| {
        if v.is_nan() {
            None
        } else if v < m {
            Some(v)
        } else {
            Some(m)
        }
    })
    .filter(|m| !m.is_nan())
    .unwrap_or(f64::NAN)
}

/// Offset of the highest value, most recent on ties. `None` if any NaN.
pub fn window_argmax(window: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, &v) in window.iter().enumerate() {
        if v.is_nan() {
            return None;
        }
        match best {
            Some((_, m)) if v < m => {}
            _ => best = Some((j, v)),
        }
    }
    best.map(|(j, _)| j)
}

/// Offset of the lowest value, most recent on ties. `None` if any NaN.
pub fn window_argmin(window: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, &v) in window.iter().enumerate() {
        if v.is_nan() {
            return None;
        }
        match best {
            Some((_, m)) if v > m => {}
            _ => best = Some((j, v)),
        }
    }
    best.map(|(j, _)| j)
}

/// Population mean and variance of a window (two-pass).
pub fn mean_variance(window: &[f64]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance)
}

/// Splits a price change into (gain, loss), both non-negative.
/// A NaN change yields (NaN, NaN).
pub fn gain_loss(change: f64) -> (f64, f64) {
    if change.is_nan() {
        (f64::NAN, f64::NAN)
    } else if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

/// Max of two values that propagates NaN.
pub fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Min of two values that propagates NaN.
pub fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// True range of one bar against the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    nan_max(nan_max(high - low, (high - prev_close).abs()), (low - prev_close).abs())
}

/// Linearly weighted moving average, weights `1..=period` (newest heaviest).
///
/// Element `k` covers `values[k..k + period]`; empty if the input is shorter.
pub fn weighted_average(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if period == 0 || n < period {
        return Vec::new();
    }
    let denom = (period * (period + 1)) as f64 / 2.0;
    values
        .windows(period)
        .map(|w| {
            w.iter()
                .enumerate()
                .map(|(j, v)| (j + 1) as f64 * v)
                .sum::<f64>()
                / denom
        })
        .collect()
}

/// Simple moving average; element `k` covers `values[k..k + period]`.
pub fn simple_average(values: &[f64], period: usize) -> Vec<f64> {
    rolling_sum(values, period)
        .into_iter()
        .map(|s| s / period as f64)
        .collect()
}

//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses, seeded with the
//! plain average of the first `period` changes.
//! RSI = 100 * avg_gain / (avg_gain + avg_loss)
//! Lookback: period.
//! Edge cases: no movement at all → RSI = 50.
//!
//! Stochastic RSI places each RSI value within the range of the last `period`
//! RSI values: (rsi - min) / (max - min), 0 when the range is flat.
//! Lookback: 2 * period - 1.

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period, single_period_min2};
use crate::series::{gain_loss, window_max, window_min};

use super::{lookback_period, PERIOD, REAL};

pub fn rsi() -> DescriptorBuilder {
    IndicatorDescriptor::builder("rsi", "Relative Strength Index", IndicatorKind::Indicator)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["rsi"])
        .lookback(lookback_period)
        .compute(compute_rsi)
}

fn compute_rsi(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = rsi_series(inputs[0], period(options, 0));
}

/// RSI of `x`; element `k` is bar `k + p`.
fn rsi_series(x: &[f64], p: usize) -> Vec<f64> {
    let per = 1.0 / p as f64;
    let mut out = Vec::with_capacity(x.len() - p);

    // Seed: average gain and average loss over first `period` changes
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for w in x[..=p].windows(2) {
        let (gain, loss) = gain_loss(w[1] - w[0]);
        avg_gain += gain;
        avg_loss += loss;
    }
    avg_gain *= per;
    avg_loss *= per;
    out.push(strength(avg_gain, avg_loss));

    for i in (p + 1)..x.len() {
        let (gain, loss) = gain_loss(x[i] - x[i - 1]);
        avg_gain = (gain - avg_gain) * per + avg_gain;
        avg_loss = (loss - avg_loss) * per + avg_loss;
        out.push(strength(avg_gain, avg_loss));
    }
    out
}

pub fn stochrsi() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "stochrsi",
        "Stochastic Relative Strength Index",
        IndicatorKind::Indicator,
    )
    .fixed_inputs(REAL)
    .options(PERIOD, single_period_min2)
    .outputs(&["stochrsi"])
    .lookback(stochrsi_lookback)
    .compute(compute_stochrsi)
}

fn stochrsi_lookback(options: &[f64]) -> usize {
    period(options, 0) * 2 - 1
}

fn compute_stochrsi(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    outputs[0] = rsi_series(inputs[0], p)
        .windows(p)
        .map(|w| {
            let (low, high) = (window_min(w), window_max(w));
            let spread = high - low;
            if spread == 0.0 {
                0.0
            } else {
                (w[p - 1] - low) / spread
            }
        })
        .collect();
}

/// 100 * gain / (gain + loss); NaN stays NaN.
pub(crate) fn strength(gain: f64, loss: f64) -> f64 {
    let total = gain + loss;
    if total == 0.0 {
        50.0
    } else {
        100.0 * gain / total
    }
}

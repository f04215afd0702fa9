//! True range family.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), with the
//! first bar falling back to high-low.
//! ATR uses Wilder smoothing (alpha = 1/period), seeded with the mean of the
//! first `period` true ranges. NATR = 100 * ATR / close.
//!
//! The bar range high - low feeds two more:
//! - `cvi`: Chaikin volatility, the percentage change over `period` bars of
//!   EMA(period) of the range.
//! - `mass`: mass index, the `period`-bar sum of EMA9(range) / EMA9(EMA9(range)).
//!
//! Lookback: tr 0, atr/natr period - 1, cvi 2 * period - 1, mass period + 15.

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};
use crate::series::{rolling_sum, true_range};

use super::{lookback_period_minus_one, lookback_zero, HIGH_LOW, HIGH_LOW_CLOSE, PERIOD};

/// Span of the mass index EMAs.
const MASS_SPAN: usize = 9;

/// True range per bar. TR[0] = high[0] - low[0] (no previous close).
pub(crate) fn true_range_series(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(high.len());
    if let (Some(h), Some(l)) = (high.first(), low.first()) {
        tr.push(h - l);
    }
    for i in 1..high.len() {
        tr.push(true_range(high[i], low[i], close[i - 1]));
    }
    tr
}

/// Wilder-smoothed true range; element `k` lines up with bar `k + period - 1`.
fn average_true_range(high: &[f64], low: &[f64], close: &[f64], p: usize) -> Vec<f64> {
    let tr = true_range_series(high, low, close);
    let per = 1.0 / p as f64;

    let mut result = Vec::with_capacity(tr.len() + 1 - p);
    let mut val = tr[..p].iter().sum::<f64>() * per;
    result.push(val);
    for &t in &tr[p..] {
        val = (t - val) * per + val;
        result.push(val);
    }
    result
}

pub fn tr() -> DescriptorBuilder {
    IndicatorDescriptor::builder("tr", "True Range", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE)
        .outputs(&["tr"])
        .lookback(lookback_zero)
        .compute(compute_tr)
}

fn compute_tr(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = true_range_series(inputs[0], inputs[1], inputs[2]);
}

pub fn atr() -> DescriptorBuilder {
    IndicatorDescriptor::builder("atr", "Average True Range", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE)
        .options(PERIOD, single_period)
        .outputs(&["atr"])
        .lookback(lookback_period_minus_one)
        .compute(compute_atr)
}

fn compute_atr(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = average_true_range(inputs[0], inputs[1], inputs[2], period(options, 0));
}

pub fn natr() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "natr",
        "Normalized Average True Range",
        IndicatorKind::Indicator,
    )
    .fixed_inputs(HIGH_LOW_CLOSE)
    .options(PERIOD, single_period)
    .outputs(&["natr"])
    .lookback(lookback_period_minus_one)
    .compute(compute_natr)
}

fn compute_natr(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let close = &inputs[2][p - 1..];
    outputs[0] = average_true_range(inputs[0], inputs[1], inputs[2], p)
        .iter()
        .zip(close)
        .map(|(atr, c)| 100.0 * atr / c)
        .collect();
}

/// EMA of high - low, seeded with the first bar's range.
fn range_ema(high: &[f64], low: &[f64], p: usize) -> Vec<f64> {
    let per = 2.0 / (p as f64 + 1.0);
    let mut val = high[0] - low[0];
    high.iter()
        .zip(low)
        .map(|(h, l)| {
            val = ((h - l) - val) * per + val;
            val
        })
        .collect()
}

pub fn cvi() -> DescriptorBuilder {
    IndicatorDescriptor::builder("cvi", "Chaikins Volatility", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW)
        .options(PERIOD, single_period)
        .outputs(&["cvi"])
        .lookback(cvi_lookback)
        .compute(compute_cvi)
}

fn cvi_lookback(options: &[f64]) -> usize {
    period(options, 0) * 2 - 1
}

fn compute_cvi(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let ema = range_ema(inputs[0], inputs[1], p);
    let start = cvi_lookback(options);
    outputs[0] = (start..ema.len())
        .map(|i| {
            let then = ema[i - p];
            100.0 * (ema[i] - then) / then
        })
        .collect();
}

pub fn mass() -> DescriptorBuilder {
    IndicatorDescriptor::builder("mass", "Mass Index", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW)
        .options(PERIOD, single_period)
        .outputs(&["mass"])
        .lookback(mass_lookback)
        .compute(compute_mass)
}

fn mass_lookback(options: &[f64]) -> usize {
    (MASS_SPAN - 1) * 2 + period(options, 0) - 1
}

fn compute_mass(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let single = range_ema(inputs[0], inputs[1], MASS_SPAN);
    let per = 2.0 / (MASS_SPAN as f64 + 1.0);

    // the second EMA starts once the first has run MASS_SPAN bars
    let first = MASS_SPAN - 1;
    let mut double = single[first];
    let ratio: Vec<f64> = single[first..]
        .iter()
        .map(|&s| {
            double = (s - double) * per + double;
            s / double
        })
        .collect();
    outputs[0] = rolling_sum(&ratio[first..], period(options, 0));
}

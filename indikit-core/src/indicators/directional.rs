//! Directional movement.
//!
//! +DM = high[i] - high[i-1], -DM = low[i-1] - low[i]; the smaller of the two
//! (and any negative one) is zeroed. Both are Wilder-summed: the first value
//! is the plain sum of the first period - 1 moves, then
//! dm = dm * (period - 1) / period + move.
//!
//! - `dm`: the smoothed +DM and -DM.
//! - `di`: 100 * smoothed +DM / smoothed true range, and the same for -DM. The
//!   true range is Wilder-summed like the moves; no range reads 0.
//! - `dx`: 100 * |+DM - -DM| / (+DM + -DM), 0 when both are 0.
//! - `adx`: the mean of the first `period` DX values, then Wilder smoothing.
//!
//! Lookback: dm/di/dx period - 1, adx 2 * (period - 1).

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};
use crate::series::true_range;

use super::{lookback_period_minus_one, HIGH_LOW, HIGH_LOW_CLOSE, PERIOD};

/// Directional move of one bar against the previous one.
fn direction(high: f64, prev_high: f64, low: f64, prev_low: f64) -> (f64, f64) {
    if high.is_nan() || prev_high.is_nan() || low.is_nan() || prev_low.is_nan() {
        return (f64::NAN, f64::NAN);
    }
    let mut up = high - prev_high;
    let mut down = prev_low - low;
    if up < 0.0 {
        up = 0.0;
    } else if up > down {
        down = 0.0;
    }
    if down < 0.0 {
        down = 0.0;
    } else if down > up {
        up = 0.0;
    }
    (up, down)
}

/// Smoothed (+DM, -DM); element `k` is bar `k + period - 1`.
fn smoothed_movement(high: &[f64], low: &[f64], p: usize) -> Vec<(f64, f64)> {
    let per = (p as f64 - 1.0) / p as f64;
    let moves = |i: usize| direction(high[i], high[i - 1], low[i], low[i - 1]);

    let (mut up, mut down) = (0.0, 0.0);
    for i in 1..p {
        let (u, d) = moves(i);
        up += u;
        down += d;
    }

    let mut result = Vec::with_capacity(high.len() + 1 - p);
    result.push((up, down));
    for i in p..high.len() {
        let (u, d) = moves(i);
        up = up * per + u;
        down = down * per + d;
        result.push((up, down));
    }
    result
}

/// Wilder-summed true range, aligned with [`smoothed_movement`].
fn smoothed_range(high: &[f64], low: &[f64], close: &[f64], p: usize) -> Vec<f64> {
    let per = (p as f64 - 1.0) / p as f64;
    let range = |i: usize| true_range(high[i], low[i], close[i - 1]);

    let mut total: f64 = (1..p).map(range).sum();
    let mut result = Vec::with_capacity(high.len() + 1 - p);
    result.push(total);
    for i in p..high.len() {
        total = total * per + range(i);
        result.push(total);
    }
    result
}

fn movement_index(up: f64, down: f64) -> f64 {
    let total = up + down;
    if total == 0.0 {
        0.0
    } else {
        100.0 * (up - down).abs() / total
    }
}

pub fn dm() -> DescriptorBuilder {
    IndicatorDescriptor::builder("dm", "Directional Movement", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW)
        .options(PERIOD, single_period)
        .outputs(&["plus_dm", "minus_dm"])
        .lookback(lookback_period_minus_one)
        .compute(compute_dm)
}

fn compute_dm(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let (plus, minus): (Vec<f64>, Vec<f64>) =
        smoothed_movement(inputs[0], inputs[1], period(options, 0))
            .into_iter()
            .unzip();
    outputs[0] = plus;
    outputs[1] = minus;
}

pub fn di() -> DescriptorBuilder {
    IndicatorDescriptor::builder("di", "Directional Indicator", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE)
        .options(PERIOD, single_period)
        .outputs(&["plus_di", "minus_di"])
        .lookback(lookback_period_minus_one)
        .compute(compute_di)
}

fn compute_di(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let (high, low, close) = (inputs[0], inputs[1], inputs[2]);
    let p = period(options, 0);
    let ranges = smoothed_range(high, low, close, p);
    let moves = smoothed_movement(high, low, p);
    for (k, (&tr, &(up, down))) in ranges.iter().zip(&moves).enumerate() {
        let (plus, minus) = if tr == 0.0 {
            (0.0, 0.0)
        } else {
            (100.0 * up / tr, 100.0 * down / tr)
        };
        outputs[0][k] = plus;
        outputs[1][k] = minus;
    }
}

pub fn dx() -> DescriptorBuilder {
    IndicatorDescriptor::builder("dx", "Directional Movement Index", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW)
        .options(PERIOD, single_period)
        .outputs(&["dx"])
        .lookback(lookback_period_minus_one)
        .compute(compute_dx)
}

fn compute_dx(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = smoothed_movement(inputs[0], inputs[1], period(options, 0))
        .into_iter()
        .map(|(up, down)| movement_index(up, down))
        .collect();
}

pub fn adx() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "adx",
        "Average Directional Movement Index",
        IndicatorKind::Indicator,
    )
    .fixed_inputs(HIGH_LOW)
    .options(PERIOD, single_period)
    .outputs(&["adx"])
    .lookback(adx_lookback)
    .compute(compute_adx)
}

fn adx_lookback(options: &[f64]) -> usize {
    (period(options, 0) - 1) * 2
}

fn compute_adx(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let per = (p as f64 - 1.0) / p as f64;
    let inv = 1.0 / p as f64;
    let dx: Vec<f64> = smoothed_movement(inputs[0], inputs[1], p)
        .into_iter()
        .map(|(up, down)| movement_index(up, down))
        .collect();

    let out = &mut outputs[0];
    let mut total: f64 = dx[..p].iter().sum();
    out[0] = total * inv;
    for (k, &v) in dx[p..].iter().enumerate() {
        total = total * per + v;
        out[k + 1] = total * inv;
    }
}

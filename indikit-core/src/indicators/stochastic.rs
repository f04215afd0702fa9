//! Range-position oscillators.
//!
//! - `stoch`: fast %K = 100 * (close - lowest low) / (highest high - lowest low)
//!   over `%k period` bars; %K is SMA(`%k slowing period`) of fast %K and %D is
//!   SMA(`%d period`) of %K.
//! - `willr`: -100 * (highest high - close) / (highest high - lowest low).
//!
//! A window with no range reads 0 for both.
//!
//! Lookback: stoch %k + slowing + %d - 3, willr period - 1.

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, period_at_least, single_period, OptionViolation};
use crate::series::{simple_average, window_max, window_min};

use super::{lookback_period_minus_one, HIGH_LOW_CLOSE, PERIOD};

/// (highest high, lowest low, close) for every `p`-bar window; element `k`
/// is bar `k + p - 1`.
fn windows(high: &[f64], low: &[f64], close: &[f64], p: usize) -> Vec<(f64, f64, f64)> {
    high.windows(p)
        .zip(low.windows(p))
        .zip(&close[p - 1..])
        .map(|((h, l), &c)| (window_max(h), window_min(l), c))
        .collect()
}

pub fn stoch() -> DescriptorBuilder {
    IndicatorDescriptor::builder("stoch", "Stochastic Oscillator", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE)
        .options(&["%k period", "%k slowing period", "%d period"], check_stoch)
        .outputs(&["stoch_k", "stoch_d"])
        .lookback(stoch_lookback)
        .compute(compute_stoch)
}

fn check_stoch(options: &[f64]) -> Result<(), OptionViolation> {
    for index in 0..3 {
        period_at_least(options, index, 1)?;
    }
    Ok(())
}

fn stoch_lookback(options: &[f64]) -> usize {
    period(options, 0) + period(options, 1) + period(options, 2) - 3
}

fn compute_stoch(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let (kp, ks, dp) = (period(options, 0), period(options, 1), period(options, 2));

    let fast_k: Vec<f64> = windows(inputs[0], inputs[1], inputs[2], kp)
        .into_iter()
        .map(|(hh, ll, c)| {
            let range = hh - ll;
            if range == 0.0 {
                0.0
            } else {
                100.0 * (c - ll) / range
            }
        })
        .collect();

    let slow_k = simple_average(&fast_k, ks);
    outputs[1] = simple_average(&slow_k, dp);
    outputs[0] = slow_k[dp - 1..].to_vec();
}

pub fn willr() -> DescriptorBuilder {
    IndicatorDescriptor::builder("willr", "Williams %R", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE)
        .options(PERIOD, single_period)
        .outputs(&["willr"])
        .lookback(lookback_period_minus_one)
        .compute(compute_willr)
}

fn compute_willr(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = windows(inputs[0], inputs[1], inputs[2], period(options, 0))
        .into_iter()
        .map(|(hh, ll, c)| {
            let range = hh - ll;
            if range == 0.0 {
                0.0
            } else {
                -100.0 * (hh - c) / range
            }
        })
        .collect();
}

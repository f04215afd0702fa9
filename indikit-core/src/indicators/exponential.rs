//! Exponential moving averages.
//!
//! alpha = 2 / (period + 1). The recursion is seeded with the first input
//! sample, so `ema` has no lookback.
//!
//! - `ema`: e[i] = (x[i] - e[i-1]) * alpha + e[i-1], e[0] = x[0].
//! - `dema`: 2*e1 - e2, where e2 is the EMA of e1 started once e1 has run `period` samples.
//! - `tema`: 3*e1 - 3*e2 + e3, with e3 started the same way from e2.
//! - `trix`: 100 * one-bar change of e3 / e3.
//! - `zlema`: EMA of 2*x[i] - x[i-lag], lag = (period-1)/2, seeded with x[lag-1].
//! - `vidya`: EMA whose alpha is scaled by stddev(short) / stddev(long) of the
//!   input, seeded with x[long-2]. A flat long window leaves the average unchanged.
//!
//! Lookback: ema 0, dema 2*(period-1), tema 3*(period-1), trix 3*(period-1)+1,
//! zlema (period-1)/2, vidya long period - 2.
//!
//! A NaN input poisons every later value; the recursion has no window to
//! recover from it.

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, period_at_least, single_period, unit_interval, OptionViolation};
use crate::series::mean_variance;

use super::{lookback_zero, PERIOD, REAL};

fn alpha(p: usize) -> f64 {
    2.0 / (p as f64 + 1.0)
}

pub fn ema() -> DescriptorBuilder {
    IndicatorDescriptor::builder("ema", "Exponential Moving Average", IndicatorKind::Overlay)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["ema"])
        .lookback(lookback_zero)
        .compute(compute_ema)
}

fn compute_ema(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let per = alpha(period(options, 0));
    let out = &mut outputs[0];

    let mut val = x[0];
    out[0] = val;
    for i in 1..x.len() {
        val = (x[i] - val) * per + val;
        out[i] = val;
    }
}

pub fn dema() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "dema",
        "Double Exponential Moving Average",
        IndicatorKind::Overlay,
    )
    .fixed_inputs(REAL)
    .options(PERIOD, single_period)
    .outputs(&["dema"])
    .lookback(dema_lookback)
    .compute(compute_dema)
}

fn dema_lookback(options: &[f64]) -> usize {
    (period(options, 0) - 1) * 2
}

fn compute_dema(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);
    let per = alpha(p);
    let per1 = 1.0 - per;
    let start = (p - 1) * 2;
    let out = &mut outputs[0];

    let mut ema = x[0];
    let mut ema2 = ema;
    for (i, &v) in x.iter().enumerate() {
        ema = ema * per1 + v * per;
        if i == p - 1 {
            ema2 = ema;
        }
        if i >= p - 1 {
            ema2 = ema2 * per1 + ema * per;
            if i >= start {
                out[i - start] = ema * 2.0 - ema2;
            }
        }
    }
}

pub fn tema() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "tema",
        "Triple Exponential Moving Average",
        IndicatorKind::Overlay,
    )
    .fixed_inputs(REAL)
    .options(PERIOD, single_period)
    .outputs(&["tema"])
    .lookback(tema_lookback)
    .compute(compute_tema)
}

fn tema_lookback(options: &[f64]) -> usize {
    (period(options, 0) - 1) * 3
}

fn compute_tema(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);
    let per = alpha(p);
    let per1 = 1.0 - per;
    let start = (p - 1) * 3;
    let out = &mut outputs[0];

    let mut ema = x[0];
    let mut ema2 = 0.0;
    let mut ema3 = 0.0;
    for (i, &v) in x.iter().enumerate() {
        ema = ema * per1 + v * per;
        if i == p - 1 {
            ema2 = ema;
        }
        if i >= p - 1 {
            ema2 = ema2 * per1 + ema * per;
            if i == (p - 1) * 2 {
                ema3 = ema2;
            }
            if i >= (p - 1) * 2 {
                ema3 = ema3 * per1 + ema2 * per;
                if i >= start {
                    out[i - start] = 3.0 * ema - 3.0 * ema2 + ema3;
                }
            }
        }
    }
}

pub fn trix() -> DescriptorBuilder {
    IndicatorDescriptor::builder("trix", "Trix", IndicatorKind::Indicator)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["trix"])
        .lookback(trix_lookback)
        .compute(compute_trix)
}

fn trix_lookback(options: &[f64]) -> usize {
    (period(options, 0) - 1) * 3 + 1
}

fn compute_trix(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);
    let per = alpha(p);
    let start = trix_lookback(options);
    let out = &mut outputs[0];

    let mut ema1 = x[0];
    let mut ema2 = 0.0;
    let mut ema3 = 0.0;
    for (i, &v) in x.iter().enumerate() {
        ema1 = (v - ema1) * per + ema1;
        if i < p - 1 {
            continue;
        }
        if i == p - 1 {
            ema2 = ema1;
        } else {
            ema2 = (ema1 - ema2) * per + ema2;
        }
        if i == (p - 1) * 2 {
            ema3 = ema2;
        } else if i > (p - 1) * 2 {
            let last = ema3;
            ema3 = (ema2 - ema3) * per + ema3;
            if i >= start {
                out[i - start] = (ema3 - last) / ema3 * 100.0;
            }
        }
    }
}

pub fn zlema() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "zlema",
        "Zero-Lag Exponential Moving Average",
        IndicatorKind::Overlay,
    )
    .fixed_inputs(REAL)
    .options(PERIOD, single_period)
    .outputs(&["zlema"])
    .lookback(zlema_lookback)
    .compute(compute_zlema)
}

fn zlema_lookback(options: &[f64]) -> usize {
    (period(options, 0) - 1) / 2
}

fn compute_zlema(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let per = alpha(period(options, 0));
    let lag = zlema_lookback(options);
    let out = &mut outputs[0];

    let mut val = x[lag.saturating_sub(1)];
    for i in lag..x.len() {
        let target = 2.0 * x[i] - x[i - lag];
        val = (target - val) * per + val;
        out[i - lag] = val;
    }
}

pub fn vidya() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "vidya",
        "Variable Index Dynamic Average",
        IndicatorKind::Overlay,
    )
    .fixed_inputs(REAL)
    .options(&["short period", "long period", "alpha"], check_vidya)
    .outputs(&["vidya"])
    .lookback(vidya_lookback)
    .compute(compute_vidya)
}

fn check_vidya(options: &[f64]) -> Result<(), OptionViolation> {
    let short = period_at_least(options, 0, 1)?;
    period_at_least(options, 1, short.max(2))?;
    unit_interval(options, 2)?;
    Ok(())
}

fn vidya_lookback(options: &[f64]) -> usize {
    period(options, 1) - 2
}

fn compute_vidya(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let (short, long) = (period(options, 0), period(options, 1));
    let weight = options[2];
    let start = vidya_lookback(options);
    let out = &mut outputs[0];

    let mut val = x[start];
    out[0] = val;
    for i in (start + 1)..x.len() {
        let short_sd = mean_variance(&x[i + 1 - short..=i]).1.sqrt();
        let long_sd = mean_variance(&x[i + 1 - long..=i]).1.sqrt();
        let ratio = if long_sd == 0.0 { 0.0 } else { short_sd / long_sd };
        val = (x[i] - val) * ratio * weight + val;
        out[i - start] = val;
    }
}

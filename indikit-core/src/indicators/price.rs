//! Per-bar price transforms.
//!
//! avgprice = (o + h + l + c) / 4, medprice = (h + l) / 2,
//! typprice = (h + l + c) / 3, wcprice = (h + l + 2c) / 4,
//! bop = (c - o) / (h - l) (0 for a bar with no range),
//! qstick = SMA(c - o).
//!
//! Lookback: 0, except qstick: period - 1.

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};
use crate::series::simple_average;

use super::{lookback_period_minus_one, lookback_zero, HIGH_LOW, HIGH_LOW_CLOSE, PERIOD};

const OHLC: &[&str] = &["open", "high", "low", "close"];

pub fn all() -> Vec<DescriptorBuilder> {
    vec![avgprice(), medprice(), typprice(), wcprice(), bop(), qstick()]
}

fn per_bar(
    name: &'static str,
    full_name: &'static str,
    kind: IndicatorKind,
    inputs: &'static [&'static str],
) -> DescriptorBuilder {
    IndicatorDescriptor::builder(name, full_name, kind)
        .fixed_inputs(inputs)
        .lookback(lookback_zero)
}

/// Fills `out[i] = f(bar i)` where the bar is the i-th sample of every input.
fn map_bars(inputs: &[&[f64]], out: &mut [f64], f: impl Fn(&[f64]) -> f64) {
    let mut bar = vec![0.0; inputs.len()];
    for (i, slot) in out.iter_mut().enumerate() {
        for (b, series) in bar.iter_mut().zip(inputs) {
            *b = series[i];
        }
        *slot = f(&bar);
    }
}

pub fn avgprice() -> DescriptorBuilder {
    per_bar("avgprice", "Average Price", IndicatorKind::Overlay, OHLC)
        .outputs(&["avgprice"])
        .compute(compute_avgprice)
}

fn compute_avgprice(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    map_bars(inputs, &mut outputs[0], |b| (b[0] + b[1] + b[2] + b[3]) * 0.25);
}

pub fn medprice() -> DescriptorBuilder {
    per_bar("medprice", "Median Price", IndicatorKind::Overlay, HIGH_LOW)
        .outputs(&["medprice"])
        .compute(compute_medprice)
}

fn compute_medprice(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    map_bars(inputs, &mut outputs[0], |b| (b[0] + b[1]) * 0.5);
}

pub fn typprice() -> DescriptorBuilder {
    per_bar("typprice", "Typical Price", IndicatorKind::Overlay, HIGH_LOW_CLOSE)
        .outputs(&["typprice"])
        .compute(compute_typprice)
}

fn compute_typprice(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    map_bars(inputs, &mut outputs[0], |b| (b[0] + b[1] + b[2]) / 3.0);
}

pub fn wcprice() -> DescriptorBuilder {
    per_bar("wcprice", "Weighted Close Price", IndicatorKind::Overlay, HIGH_LOW_CLOSE)
        .outputs(&["wcprice"])
        .compute(compute_wcprice)
}

fn compute_wcprice(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    map_bars(inputs, &mut outputs[0], |b| (b[0] + b[1] + b[2] + b[2]) * 0.25);
}

pub fn bop() -> DescriptorBuilder {
    per_bar("bop", "Balance of Power", IndicatorKind::Indicator, OHLC)
        .outputs(&["bop"])
        .compute(compute_bop)
}

fn compute_bop(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    map_bars(inputs, &mut outputs[0], |b| {
        let range = b[1] - b[2];
        if range <= 0.0 {
            0.0
        } else {
            (b[3] - b[0]) / range
        }
    });
}

pub fn qstick() -> DescriptorBuilder {
    IndicatorDescriptor::builder("qstick", "Qstick", IndicatorKind::Indicator)
        .fixed_inputs(&["open", "close"])
        .options(PERIOD, single_period)
        .outputs(&["qstick"])
        .lookback(lookback_period_minus_one)
        .compute(compute_qstick)
}

fn compute_qstick(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let body: Vec<f64> = inputs[1].iter().zip(inputs[0]).map(|(c, o)| c - o).collect();
    outputs[0] = simple_average(&body, period(options, 0));
}

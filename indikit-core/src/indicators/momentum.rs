//! Price change over a fixed distance.
//!
//! - `mom`: x[i] - x[i-period]
//! - `roc`: (x[i] - x[i-period]) / x[i-period]
//! - `rocr`: x[i] / x[i-period]
//! - `cmo`: 100 * (up - down) / (up + down), with up/down the summed gains and
//!   losses of the last `period` changes; 0 when nothing moved.
//!
//! Lookback: period

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};
use crate::series::{gain_loss, rolling_sum};

use super::{lookback_period, PERIOD, REAL};

fn distance(name: &'static str, full_name: &'static str) -> DescriptorBuilder {
    IndicatorDescriptor::builder(name, full_name, IndicatorKind::Indicator)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .lookback(lookback_period)
}

/// Applies `f(x[i], x[i - period])` for every output sample.
fn pairwise(inputs: &[&[f64]], options: &[f64], out: &mut [f64], f: impl Fn(f64, f64) -> f64) {
    let x = inputs[0];
    let p = period(options, 0);
    for (slot, (now, then)) in out.iter_mut().zip(x[p..].iter().zip(x)) {
        *slot = f(*now, *then);
    }
}

pub fn mom() -> DescriptorBuilder {
    distance("mom", "Momentum").outputs(&["mom"]).compute(compute_mom)
}

fn compute_mom(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    pairwise(inputs, options, &mut outputs[0], |now, then| now - then);
}

pub fn roc() -> DescriptorBuilder {
    distance("roc", "Rate of Change").outputs(&["roc"]).compute(compute_roc)
}

fn compute_roc(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    pairwise(inputs, options, &mut outputs[0], |now, then| (now - then) / then);
}

pub fn rocr() -> DescriptorBuilder {
    distance("rocr", "Rate of Change Ratio")
        .outputs(&["rocr"])
        .compute(compute_rocr)
}

fn compute_rocr(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    pairwise(inputs, options, &mut outputs[0], |now, then| now / then);
}

pub fn cmo() -> DescriptorBuilder {
    distance("cmo", "Chande Momentum Oscillator")
        .outputs(&["cmo"])
        .compute(compute_cmo)
}

fn compute_cmo(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);
    let (gains, losses): (Vec<f64>, Vec<f64>) =
        x.windows(2).map(|w| gain_loss(w[1] - w[0])).unzip();

    let up = rolling_sum(&gains, p);
    let down = rolling_sum(&losses, p);
    outputs[0] = up
        .iter()
        .zip(&down)
        .map(|(u, d)| {
            let total = u + d;
            if total == 0.0 {
                0.0
            } else {
                100.0 * (u - d) / total
            }
        })
        .collect();
}

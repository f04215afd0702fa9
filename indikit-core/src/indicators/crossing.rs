//! Crossing detection between two series.
//!
//! Output is 1 on a bar where the relationship flipped, 0 otherwise, and NaN
//! when any of the four samples compared is NaN.
//!
//! - `crossover`: a crosses above b (a[i] > b[i] and a[i-1] <= b[i-1]).
//! - `crossany`: a crosses b in either direction.
//!
//! Lookback: 1

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};

pub fn all() -> Vec<DescriptorBuilder> {
    vec![crossover(), crossany()]
}

fn comparative(name: &'static str, full_name: &'static str) -> DescriptorBuilder {
    IndicatorDescriptor::builder(name, full_name, IndicatorKind::Comparative)
        .fixed_inputs(&["real", "real"])
        .lookback(|_| 1)
}

/// Applies `crossed(a, b, prev_a, prev_b)` to every bar after the first.
fn compare(inputs: &[&[f64]], out: &mut [f64], crossed: fn(f64, f64, f64, f64) -> bool) {
    let (a, b) = (inputs[0], inputs[1]);
    for (k, slot) in out.iter_mut().enumerate() {
        let i = k + 1;
        let bar = [a[i], b[i], a[i - 1], b[i - 1]];
        *slot = if bar.iter().any(|v| v.is_nan()) {
            f64::NAN
        } else if crossed(bar[0], bar[1], bar[2], bar[3]) {
            1.0
        } else {
            0.0
        };
    }
}

pub fn crossover() -> DescriptorBuilder {
    comparative("crossover", "Crossover")
        .outputs(&["crossover"])
        .compute(compute_crossover)
}

fn compute_crossover(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    compare(inputs, &mut outputs[0], |a, b, pa, pb| a > b && pa <= pb);
}

pub fn crossany() -> DescriptorBuilder {
    comparative("crossany", "Crossany")
        .outputs(&["crossany"])
        .compute(compute_crossany)
}

fn compute_crossany(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    compare(inputs, &mut outputs[0], |a, b, pa, pb| {
        (a > b && pa <= pb) || (a < b && pa >= pb)
    });
}

//! Decaying peaks.
//!
//! Each output is the larger of the current sample and the previous output
//! after decay, so a spike fades out over `period` bars.
//!
//! - `decay`: linear, previous - 1/period.
//! - `edecay`: exponential, previous * (1 - 1/period).
//!
//! Lookback: 0

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};
use crate::series::nan_max;

use super::{lookback_zero, PERIOD, REAL};

fn decaying(name: &'static str, full_name: &'static str) -> DescriptorBuilder {
    IndicatorDescriptor::builder(name, full_name, IndicatorKind::Math)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .lookback(lookback_zero)
}

/// Runs `out[i] = max(x[i], fade(out[i-1]))`, carrying a NaN forward.
fn fade_peaks(x: &[f64], out: &mut [f64], fade: impl Fn(f64) -> f64) {
    let mut peak = x[0];
    out[0] = peak;
    for i in 1..x.len() {
        peak = nan_max(x[i], fade(peak));
        out[i] = peak;
    }
}

pub fn decay() -> DescriptorBuilder {
    decaying("decay", "Linear Decay")
        .outputs(&["decay"])
        .compute(compute_decay)
}

fn compute_decay(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let step = 1.0 / period(options, 0) as f64;
    fade_peaks(inputs[0], &mut outputs[0], |prev| prev - step);
}

pub fn edecay() -> DescriptorBuilder {
    decaying("edecay", "Exponential Decay")
        .outputs(&["edecay"])
        .compute(compute_edecay)
}

fn compute_edecay(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let keep = 1.0 - 1.0 / period(options, 0) as f64;
    fade_peaks(inputs[0], &mut outputs[0], |prev| prev * keep);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_series, eval, DEFAULT_EPSILON};

    #[test]
    fn linear_decay_fades_a_spike() {
        let x = [0.0, 1.0, 0.0, 0.0, 0.9];
        let r = eval(decay(), &[&x], &[4.0]);
        assert_eq!(r.lookback(), 0);
        assert_series(&r.outputs()[0], &[0.0, 1.0, 0.75, 0.5, 0.9], DEFAULT_EPSILON);
    }

    #[test]
    fn exponential_decay_fades_a_spike() {
        let x = [0.0, 8.0, 0.0, 0.0, 5.0];
        let r = eval(edecay(), &[&x], &[2.0]);
        assert_series(&r.outputs()[0], &[0.0, 8.0, 4.0, 2.0, 5.0], DEFAULT_EPSILON);
    }

    #[test]
    fn nan_is_not_skipped() {
        let r = eval(decay(), &[&[1.0, f64::NAN, 3.0]], &[2.0]);
        assert_eq!(r.outputs()[0][0], 1.0);
        assert!(r.outputs()[0][1].is_nan());
        assert!(r.outputs()[0][2].is_nan());
    }
}

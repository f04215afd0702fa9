//! Mesa Sine Wave.
//!
//! Correlates the last `period` samples with one cycle of cosine and sine to
//! get the dominant cycle phase, then reports sin(phase) and the 45° lead
//! sin(phase + pi/4).
//!
//! Lookback: period

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};

use super::{lookback_period, PERIOD, REAL};

// Truncated, as in the published reference values.
#[allow(clippy::approx_constant)]
const PI: f64 = 3.1415926;
const TWO_PI: f64 = PI * 2.0;

pub fn msw() -> DescriptorBuilder {
    IndicatorDescriptor::builder("msw", "Mesa Sine Wave", IndicatorKind::Indicator)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["msw_sine", "msw_lead"])
        .lookback(lookback_period)
        .compute(compute_msw)
}

/// Phase in [0, 2pi] of the cycle ending at `x[i]`; `None` if the window has a NaN.
fn cycle_phase(x: &[f64], i: usize, p: usize) -> Option<f64> {
    let mut real = 0.0;
    let mut imag = 0.0;
    for j in 0..p {
        let weight = x[i - j];
        if weight.is_nan() {
            return None;
        }
        let angle = TWO_PI * j as f64 / p as f64;
        real += angle.cos() * weight;
        imag += angle.sin() * weight;
    }

    let mut phase = if real.abs() > 0.001 {
        (imag / real).atan()
    } else if imag < 0.0 {
        -PI
    } else {
        PI
    };
    if real < 0.0 {
        phase += PI;
    }
    phase += PI / 2.0;
    if phase < 0.0 {
        phase += TWO_PI;
    }
    if phase > TWO_PI {
        phase -= TWO_PI;
    }
    Some(phase)
}

fn compute_msw(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);

    for i in p..x.len() {
        let (sine, lead) = match cycle_phase(x, i, p) {
            Some(phase) => (phase.sin(), (phase + PI / 4.0).sin()),
            None => (f64::NAN, f64::NAN),
        };
        outputs[0][i - p] = sine;
        outputs[1][i - p] = lead;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_stays_in_range() {
        let x: Vec<f64> = (0..40).map(|i| (i as f64 * 0.7).sin() * 3.0 + 50.0).collect();
        for i in 8..x.len() {
            let phase = cycle_phase(&x, i, 8).unwrap();
            assert!((0.0..=TWO_PI).contains(&phase), "phase {phase} at {i}");
        }
    }

    #[test]
    fn outputs_are_bounded_sines() {
        let x: Vec<f64> = (0..30).map(|i| 100.0 + (i % 7) as f64).collect();
        let r = crate::indicators::eval(msw(), &[&x], &[5.0]);
        assert_eq!(r.lookback(), 5);
        for series in r.outputs() {
            assert!(series.iter().all(|v| (-1.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn nan_in_window_is_nan() {
        let mut x: Vec<f64> = (0..12).map(|i| i as f64).collect();
        x[7] = f64::NAN;
        let r = crate::indicators::eval(msw(), &[&x], &[3.0]);
        // windows ending at 7, 8, 9 hold the NaN
        for k in 4..7 {
            assert!(r.outputs()[0][k].is_nan());
            assert!(r.outputs()[1][k].is_nan());
        }
        assert!(!r.outputs()[0][7].is_nan());
    }
}

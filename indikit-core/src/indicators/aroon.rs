//! Aroon: measures time since highest high and lowest low as a percentage.
//!
//! Aroon Up = 100 * (period - bars_since_highest_high) / period
//! Aroon Down = 100 * (period - bars_since_lowest_low) / period
//! Aroon Oscillator = Up - Down
//! The window spans period + 1 bars; ties go to the most recent bar.
//! Lookback: period.

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};
use crate::series::{window_argmax, window_argmin};

use super::{lookback_period, HIGH_LOW, PERIOD};

/// (down, up) per bar; element `k` is bar `k + period`.
fn bands(high: &[f64], low: &[f64], p: usize) -> Vec<(f64, f64)> {
    let scale = 100.0 / p as f64;
    high.windows(p + 1)
        .zip(low.windows(p + 1))
        .map(|(h, l)| {
            let up = window_argmax(h).map_or(f64::NAN, |j| j as f64 * scale);
            let down = window_argmin(l).map_or(f64::NAN, |j| j as f64 * scale);
            (down, up)
        })
        .collect()
}

pub fn aroon() -> DescriptorBuilder {
    IndicatorDescriptor::builder("aroon", "Aroon", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW)
        .options(PERIOD, single_period)
        .outputs(&["aroon_down", "aroon_up"])
        .lookback(lookback_period)
        .compute(compute_aroon)
}

fn compute_aroon(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let (down, up): (Vec<f64>, Vec<f64>) =
        bands(inputs[0], inputs[1], period(options, 0)).into_iter().unzip();
    outputs[0] = down;
    outputs[1] = up;
}

pub fn aroonosc() -> DescriptorBuilder {
    IndicatorDescriptor::builder("aroonosc", "Aroon Oscillator", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW)
        .options(PERIOD, single_period)
        .outputs(&["aroonosc"])
        .lookback(lookback_period)
        .compute(compute_aroonosc)
}

fn compute_aroonosc(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = bands(inputs[0], inputs[1], period(options, 0))
        .into_iter()
        .map(|(down, up)| up - down)
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_series, eval, DEFAULT_EPSILON};

    #[test]
    fn aroon_up_at_new_high() {
        let high = [10.0, 11.0, 12.0, 13.0];
        let low = [9.0, 10.0, 11.0, 12.0];
        let r = eval(aroon(), &[&high, &low], &[3.0]);
        assert_eq!(r.lookback(), 3);
        assert_series(r.output_named("aroon_up").unwrap(), &[100.0], DEFAULT_EPSILON);
        assert_series(r.output_named("aroon_down").unwrap(), &[0.0], DEFAULT_EPSILON);
    }

    #[test]
    fn ties_prefer_most_recent_bar() {
        let high = [12.0, 10.0, 12.0, 11.0];
        let low = [9.0, 8.0, 9.0, 8.0];
        let r = eval(aroon(), &[&high, &low], &[3.0]);
        // highest high 1 bar ago, lowest low on the current bar
        let up = 100.0 * 2.0 / 3.0;
        assert_series(&r.outputs()[1], &[up], DEFAULT_EPSILON);
        assert_series(&r.outputs()[0], &[100.0], DEFAULT_EPSILON);

        let osc = eval(aroonosc(), &[&high, &low], &[3.0]);
        assert_series(&osc.outputs()[0], &[up - 100.0], DEFAULT_EPSILON);
    }

    #[test]
    fn nan_in_window_is_nan() {
        let high = [10.0, f64::NAN, 12.0, 13.0, 14.0];
        let low = [9.0, 10.0, 11.0, 12.0, 13.0];
        let r = eval(aroon(), &[&high, &low], &[2.0]);
        assert_series(&r.outputs()[1], &[f64::NAN, f64::NAN, 100.0], DEFAULT_EPSILON);
        assert_series(&r.outputs()[0], &[0.0, 0.0, 0.0], DEFAULT_EPSILON);
    }
}

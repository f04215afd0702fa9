//! Fisher Transform.
//!
//! The bar midpoint (high + low) / 2 is placed within its `period`-bar range,
//! smoothed, clamped to (-0.999, 0.999) and passed through
//! 0.5 * ln((1 + v) / (1 - v)), itself smoothed by half. The signal line is the
//! previous fisher value (0 on the first bar).
//!
//! Lookback: period - 1

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};
use crate::series::{window_max, window_min};

use super::{lookback_period_minus_one, HIGH_LOW, PERIOD};

pub fn fisher() -> DescriptorBuilder {
    IndicatorDescriptor::builder("fisher", "Fisher Transform", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW)
        .options(PERIOD, single_period)
        .outputs(&["fisher", "fisher_signal"])
        .lookback(lookback_period_minus_one)
        .compute(compute_fisher)
}

fn compute_fisher(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let midpoint: Vec<f64> = inputs[0]
        .iter()
        .zip(inputs[1])
        .map(|(h, l)| 0.5 * (h + l))
        .collect();

    let mut value = 0.0;
    let mut fish = 0.0;
    for (k, window) in midpoint.windows(p).enumerate() {
        let (high, low) = (window_max(window), window_min(window));
        let mut range = high - low;
        if range == 0.0 {
            range = 0.001;
        }
        let bar = window[p - 1];

        value = 0.66 * ((bar - low) / range - 0.5) + 0.67 * value;
        if value > 0.99 {
            value = 0.999;
        } else if value < -0.99 {
            value = -0.999;
        }

        outputs[1][k] = fish;
        fish = 0.5 * ((1.0 + value) / (1.0 - value)).ln() + 0.5 * fish;
        outputs[0][k] = fish;
    }
}

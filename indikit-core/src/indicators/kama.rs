//! Kaufman Adaptive Moving Average.
//!
//! Efficiency ratio er = |x[i] - x[i-period]| / sum(|x[j] - x[j-1]|) over the
//! last `period` changes (1 when the market did not move). The smoothing
//! constant sc = (er * (fast - slow) + slow)^2 with fast = 2/3 and slow = 2/31,
//! and kama[i] = kama[i-1] + sc * (x[i] - kama[i-1]), seeded with x[period-1].
//!
//! Lookback: period - 1

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};
use crate::series::rolling_sum;

use super::{lookback_period_minus_one, PERIOD, REAL};

const FAST: f64 = 2.0 / (2.0 + 1.0);
const SLOW: f64 = 2.0 / (30.0 + 1.0);

pub fn kama() -> DescriptorBuilder {
    IndicatorDescriptor::builder("kama", "Kaufman Adaptive Moving Average", IndicatorKind::Overlay)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["kama"])
        .lookback(lookback_period_minus_one)
        .compute(compute_kama)
}

fn compute_kama(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);
    let out = &mut outputs[0];

    // volatility[k] = sum of |changes| ending at input index k + p
    let changes: Vec<f64> = x.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let volatility = rolling_sum(&changes, p);

    let mut val = x[p - 1];
    out[0] = val;
    for i in p..x.len() {
        let noise = volatility[i - p];
        let er = if noise == 0.0 {
            1.0
        } else {
            (x[i] - x[i - p]).abs() / noise
        };
        let sc = (er * (FAST - SLOW) + SLOW).powi(2);
        val += sc * (x[i] - val);
        out[i + 1 - p] = val;
    }
}

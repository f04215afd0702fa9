//! Commodity Channel Index.
//!
//! tp = (high + low + close) / 3
//! cci = (tp - SMA(tp)) / (0.015 * mean |SMA(tp) - tp[j]|) over the last `period` bars.
//! A window with zero mean deviation reads 0.
//!
//! Lookback: 2 * (period - 1)

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period};

use super::{HIGH_LOW_CLOSE, PERIOD};

const LAMBERT: f64 = 0.015;

pub fn cci() -> DescriptorBuilder {
    IndicatorDescriptor::builder("cci", "Commodity Channel Index", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE)
        .options(PERIOD, single_period)
        .outputs(&["cci"])
        .lookback(cci_lookback)
        .compute(compute_cci)
}

fn cci_lookback(options: &[f64]) -> usize {
    (period(options, 0) - 1) * 2
}

fn compute_cci(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let scale = 1.0 / p as f64;
    let start = cci_lookback(options);
    let typical: Vec<f64> = (0..inputs[0].len())
        .map(|i| (inputs[0][i] + inputs[1][i] + inputs[2][i]) / 3.0)
        .collect();

    for i in start..typical.len() {
        let window = &typical[i + 1 - p..=i];
        let avg = window.iter().sum::<f64>() * scale;
        let deviation = window.iter().map(|t| (avg - t).abs()).sum::<f64>() * scale;
        outputs[0][i - start] = if deviation == 0.0 {
            0.0
        } else {
            (typical[i] - avg) / (LAMBERT * deviation)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_series, eval, DEFAULT_EPSILON};

    #[test]
    fn cci_against_hand_computation() {
        // typical prices 1, 2, 3, 5 (high = low = close)
        let x = [1.0, 2.0, 3.0, 5.0];
        let r = eval(cci(), &[&x, &x, &x], &[2.0]);
        assert_eq!(r.lookback(), 2);
        // windows [2,3] and [3,5]: deviation 0.5 and 1
        let expected = [0.5 / (0.015 * 0.5), 1.0 / 0.015];
        assert_series(&r.outputs()[0], &expected, 1e-9);
    }

    #[test]
    fn flat_series_reads_zero() {
        let x = [4.0; 5];
        let r = eval(cci(), &[&x, &x, &x], &[2.0]);
        assert_series(&r.outputs()[0], &[0.0; 3], DEFAULT_EPSILON);
    }
}

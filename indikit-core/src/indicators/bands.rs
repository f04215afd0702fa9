//! Bollinger Bands.
//!
//! middle = SMA(period), upper/lower = middle +/- k * sigma, where sigma is the
//! population standard deviation of the same window and k is the `stddev`
//! option.
//!
//! Lookback: period - 1

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{finite, period, period_at_least, OptionViolation};
use crate::series::mean_variance;

use super::{lookback_period_minus_one, REAL};

pub fn bbands() -> DescriptorBuilder {
    IndicatorDescriptor::builder("bbands", "Bollinger Bands", IndicatorKind::Overlay)
        .fixed_inputs(REAL)
        .options(&["period", "stddev"], check_bbands)
        .outputs(&["bbands_lower", "bbands_middle", "bbands_upper"])
        .lookback(lookback_period_minus_one)
        .compute(compute_bbands)
}

fn check_bbands(options: &[f64]) -> Result<(), OptionViolation> {
    period_at_least(options, 0, 1)?;
    finite(options, 1)?;
    Ok(())
}

fn compute_bbands(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let k = options[1];

    for (j, window) in inputs[0].windows(p).enumerate() {
        let (mean, variance) = mean_variance(window);
        let band = k * variance.sqrt();
        outputs[0][j] = mean - band;
        outputs[1][j] = mean;
        outputs[2][j] = mean + band;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::indicators::{assert_approx, eval, DEFAULT_EPSILON};

    #[test]
    fn bands_straddle_the_mean() {
        // window [2, 4, 4, 4, 5, 5, 7, 9] has mean 5 and population sigma 2
        let x = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let r = eval(bbands(), &[&x], &[8.0, 2.0]);
        assert_eq!(r.len(), 1);
        assert_approx(r.output_named("bbands_lower").unwrap()[0], 1.0, DEFAULT_EPSILON);
        assert_approx(r.output_named("bbands_middle").unwrap()[0], 5.0, DEFAULT_EPSILON);
        assert_approx(r.output_named("bbands_upper").unwrap()[0], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_series_collapses_bands() {
        let r = eval(bbands(), &[&[3.0; 5]], &[3.0, 2.0]);
        for series in r.outputs() {
            assert!(series.iter().all(|v| (*v - 3.0).abs() < DEFAULT_EPSILON));
        }
    }

    #[test]
    fn non_finite_multiplier_is_rejected() {
        let d = bbands().build().unwrap();
        let err = d.check_options(&[5.0, f64::NAN]).unwrap_err();
        match err {
            EngineError::InvalidOption { option, .. } => assert_eq!(option, "stddev"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

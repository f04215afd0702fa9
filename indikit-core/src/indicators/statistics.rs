//! Rolling statistics over a window of `period` samples.
//!
//! Variance and standard deviation are population statistics; `stderr` is the
//! standard deviation over sqrt(period) and `md` the mean absolute deviation
//! from the window mean. The regression family fits y = a + b*x by least
//! squares with x = 1..=period over each window: `linreg` reports the fitted
//! value at x = period, `linregintercept` the one at x = 1, `tsf` the forecast
//! at x = period + 1, `linregslope` the slope b. `fosc` is the percentage gap
//! between a sample and the previous bar's forecast.
//!
//! `volatility` is the annualized (252 bars) standard deviation of one-bar
//! returns; `vhf` divides the window's high-low spread by the sum of absolute
//! changes over the same `period` steps, reading 0 on a flat window.
//!
//! Lookback: period - 1 (lag, fosc, volatility, vhf: period).

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, period_at_least, single_period, single_period_min2, OptionViolation};
use crate::series::{mean_variance, rolling_sum, window_max, window_min};

use super::{lookback_period, lookback_period_minus_one, PERIOD, REAL};

const ANNUAL: f64 = 252.0;

fn windowed(name: &'static str, full_name: &'static str, kind: IndicatorKind) -> DescriptorBuilder {
    IndicatorDescriptor::builder(name, full_name, kind)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .lookback(lookback_period_minus_one)
}

pub fn stddev() -> DescriptorBuilder {
    windowed("stddev", "Standard Deviation Over Period", IndicatorKind::Math)
        .outputs(&["stddev"])
        .compute(compute_stddev)
}

fn compute_stddev(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = inputs[0]
        .windows(period(options, 0))
        .map(|w| mean_variance(w).1.sqrt())
        .collect();
}

pub fn var() -> DescriptorBuilder {
    windowed("var", "Variance Over Period", IndicatorKind::Math)
        .outputs(&["var"])
        .compute(compute_var)
}

fn compute_var(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = inputs[0]
        .windows(period(options, 0))
        .map(|w| mean_variance(w).1)
        .collect();
}

pub fn stderr() -> DescriptorBuilder {
    windowed("stderr", "Standard Error Over Period", IndicatorKind::Math)
        .outputs(&["stderr"])
        .compute(compute_stderr)
}

fn compute_stderr(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let scale = 1.0 / (p as f64).sqrt();
    outputs[0] = inputs[0]
        .windows(p)
        .map(|w| mean_variance(w).1.sqrt() * scale)
        .collect();
}

pub fn md() -> DescriptorBuilder {
    windowed("md", "Mean Deviation Over Period", IndicatorKind::Math)
        .outputs(&["md"])
        .compute(compute_md)
}

fn compute_md(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = inputs[0]
        .windows(period(options, 0))
        .map(|w| {
            let n = w.len() as f64;
            let mean = w.iter().sum::<f64>() / n;
            w.iter().map(|v| (v - mean).abs()).sum::<f64>() / n
        })
        .collect();
}

pub fn sum() -> DescriptorBuilder {
    windowed("sum", "Sum Over Period", IndicatorKind::Math)
        .outputs(&["sum"])
        .compute(compute_sum)
}

fn compute_sum(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = rolling_sum(inputs[0], period(options, 0));
}

pub fn max() -> DescriptorBuilder {
    windowed("max", "Maximum In Period", IndicatorKind::Math)
        .outputs(&["max"])
        .compute(compute_max)
}

fn compute_max(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = inputs[0].windows(period(options, 0)).map(window_max).collect();
}

pub fn min() -> DescriptorBuilder {
    windowed("min", "Minimum In Period", IndicatorKind::Math)
        .outputs(&["min"])
        .compute(compute_min)
}

fn compute_min(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = inputs[0].windows(period(options, 0)).map(window_min).collect();
}

pub fn lag() -> DescriptorBuilder {
    IndicatorDescriptor::builder("lag", "Lag", IndicatorKind::Math)
        .fixed_inputs(REAL)
        .options(PERIOD, check_lag)
        .outputs(&["lag"])
        .lookback(lookback_period)
        .compute(compute_lag)
}

fn check_lag(options: &[f64]) -> Result<(), OptionViolation> {
    period_at_least(options, 0, 0).map(|_| ())
}

fn compute_lag(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);
    outputs[0] = x[..x.len() - p].to_vec();
}

/// Least-squares intercept and slope of `window` against x = 1..=len.
fn regression(window: &[f64]) -> (f64, f64) {
    let p = window.len() as f64;
    let sum_x = p * (p + 1.0) / 2.0;
    let sum_x2 = p * (p + 1.0) * (2.0 * p + 1.0) / 6.0;
    let sum_y: f64 = window.iter().sum();
    let sum_xy: f64 = window
        .iter()
        .enumerate()
        .map(|(j, y)| (j + 1) as f64 * y)
        .sum();

    let b = (p * sum_xy - sum_x * sum_y) / (p * sum_x2 - sum_x * sum_x);
    let a = (sum_y - b * sum_x) / p;
    (a, b)
}

fn regression_based(
    name: &'static str,
    full_name: &'static str,
    kind: IndicatorKind,
) -> DescriptorBuilder {
    IndicatorDescriptor::builder(name, full_name, kind)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period_min2)
        .lookback(lookback_period_minus_one)
}

pub fn linreg() -> DescriptorBuilder {
    regression_based("linreg", "Linear Regression", IndicatorKind::Overlay)
        .outputs(&["linreg"])
        .compute(compute_linreg)
}

fn compute_linreg(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0) as f64;
    outputs[0] = inputs[0]
        .windows(period(options, 0))
        .map(|w| {
            let (a, b) = regression(w);
            a + b * p
        })
        .collect();
}

pub fn linregintercept() -> DescriptorBuilder {
    regression_based(
        "linregintercept",
        "Linear Regression Intercept",
        IndicatorKind::Indicator,
    )
    .outputs(&["linregintercept"])
    .compute(compute_linregintercept)
}

fn compute_linregintercept(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = inputs[0]
        .windows(period(options, 0))
        .map(|w| {
            let (a, b) = regression(w);
            a + b
        })
        .collect();
}

pub fn linregslope() -> DescriptorBuilder {
    regression_based("linregslope", "Linear Regression Slope", IndicatorKind::Indicator)
        .outputs(&["linregslope"])
        .compute(compute_linregslope)
}

fn compute_linregslope(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = inputs[0]
        .windows(period(options, 0))
        .map(|w| regression(w).1)
        .collect();
}

pub fn tsf() -> DescriptorBuilder {
    regression_based("tsf", "Time Series Forecast", IndicatorKind::Overlay)
        .outputs(&["tsf"])
        .compute(compute_tsf)
}

fn compute_tsf(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0) as f64;
    outputs[0] = inputs[0]
        .windows(period(options, 0))
        .map(|w| {
            let (a, b) = regression(w);
            a + b * (p + 1.0)
        })
        .collect();
}

pub fn fosc() -> DescriptorBuilder {
    regression_based("fosc", "Forecast Oscillator", IndicatorKind::Indicator)
        .outputs(&["fosc"])
        .lookback(lookback_period)
        .compute(compute_fosc)
}

fn compute_fosc(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);
    let forecast_at = p as f64 + 1.0;
    // window k ends at bar k + p - 1 and forecasts bar k + p
    for (k, w) in x[..x.len() - 1].windows(p).enumerate() {
        let (a, b) = regression(w);
        let now = x[k + p];
        outputs[0][k] = 100.0 * (now - (a + b * forecast_at)) / now;
    }
}

pub fn volatility() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "volatility",
        "Annualized Historical Volatility",
        IndicatorKind::Indicator,
    )
    .fixed_inputs(REAL)
    .options(PERIOD, single_period)
    .outputs(&["volatility"])
    .lookback(lookback_period)
    .compute(compute_volatility)
}

fn compute_volatility(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let returns: Vec<f64> = inputs[0].windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    let annual = ANNUAL.sqrt();
    outputs[0] = returns
        .windows(period(options, 0))
        .map(|w| mean_variance(w).1.sqrt() * annual)
        .collect();
}

pub fn vhf() -> DescriptorBuilder {
    IndicatorDescriptor::builder("vhf", "Vertical Horizontal Filter", IndicatorKind::Indicator)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["vhf"])
        .lookback(lookback_period)
        .compute(compute_vhf)
}

fn compute_vhf(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);
    let changes: Vec<f64> = x.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let travel = rolling_sum(&changes, p);
    // travel[k] covers the changes into bars k + 1..=k + p
    for (k, &path) in travel.iter().enumerate() {
        let window = &x[k + 1..=k + p];
        let spread = window_max(window) - window_min(window);
        outputs[0][k] = if path == 0.0 { 0.0 } else { spread / path };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_series, eval, DEFAULT_EPSILON};

    #[test]
    fn population_variance_and_stddev() {
        let x = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_series(&eval(var(), &[&x], &[8.0]).outputs()[0], &[4.0], DEFAULT_EPSILON);
        assert_series(&eval(stddev(), &[&x], &[8.0]).outputs()[0], &[2.0], DEFAULT_EPSILON);
    }

    #[test]
    fn sum_max_min_windows() {
        let x = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(eval(sum(), &[&x], &[2.0]).outputs()[0], vec![4.0, 5.0, 5.0, 6.0]);
        assert_eq!(eval(max(), &[&x], &[3.0]).outputs()[0], vec![4.0, 4.0, 5.0]);
        assert_eq!(eval(min(), &[&x], &[3.0]).outputs()[0], vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn max_does_not_skip_nan() {
        let x = [1.0, f64::NAN, 3.0, 2.0];
        let r = eval(max(), &[&x], &[2.0]);
        assert_series(&r.outputs()[0], &[f64::NAN, f64::NAN, 3.0], DEFAULT_EPSILON);
    }

    #[test]
    fn lag_shifts_forward() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let r = eval(lag(), &[&x], &[2.0]);
        assert_eq!(r.lookback(), 2);
        assert_eq!(r.outputs()[0], vec![1.0, 2.0]);

        let r = eval(lag(), &[&x], &[0.0]);
        assert_eq!(r.outputs()[0], x.to_vec());
    }

    #[test]
    fn regression_on_a_line() {
        let x = [1.0, 3.0, 5.0, 7.0, 9.0];
        assert_series(&eval(linreg(), &[&x], &[3.0]).outputs()[0], &[5.0, 7.0, 9.0], 1e-9);
        assert_series(&eval(tsf(), &[&x], &[3.0]).outputs()[0], &[7.0, 9.0, 11.0], 1e-9);
        assert_series(
            &eval(linregslope(), &[&x], &[3.0]).outputs()[0],
            &[2.0, 2.0, 2.0],
            1e-9,
        );
    }

    #[test]
    fn stderr_and_mean_deviation() {
        let x = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let se = eval(stderr(), &[&x], &[8.0]);
        assert_series(&se.outputs()[0], &[2.0 / 8.0_f64.sqrt()], DEFAULT_EPSILON);

        // mean 3: deviations 2, 1, 0, 1, 2
        let r = eval(md(), &[&[1.0, 2.0, 3.0, 4.0, 5.0]], &[5.0]);
        assert_eq!(r.lookback(), 4);
        assert_series(&r.outputs()[0], &[1.2], DEFAULT_EPSILON);
    }

    #[test]
    fn intercept_is_the_fit_at_the_oldest_sample() {
        let x = [81.59, 81.06, 82.87, 83.00, 83.61];
        let r = eval(linregintercept(), &[&x], &[5.0]);
        assert_series(&r.outputs()[0], &[81.23], 1e-9);

        let line = [1.0, 3.0, 5.0, 7.0];
        let r = eval(linregintercept(), &[&line], &[3.0]);
        assert_series(&r.outputs()[0], &[1.0, 3.0], 1e-9);
    }

    #[test]
    fn fosc_compares_with_previous_forecast() {
        // a line is forecast exactly
        let r = eval(fosc(), &[&[1.0, 2.0, 3.0, 4.0, 5.0]], &[3.0]);
        assert_eq!(r.lookback(), 3);
        assert_series(&r.outputs()[0], &[0.0, 0.0], 1e-9);

        // forecast 4, actual 5
        let r = eval(fosc(), &[&[1.0, 2.0, 3.0, 5.0]], &[3.0]);
        assert_series(&r.outputs()[0], &[20.0], 1e-9);
    }

    #[test]
    fn volatility_of_steady_growth_is_zero() {
        let x = [100.0, 110.0, 121.0, 133.1];
        let r = eval(volatility(), &[&x], &[2.0]);
        assert_eq!(r.lookback(), 2);
        assert_series(&r.outputs()[0], &[0.0, 0.0], 1e-9);
    }

    #[test]
    fn volatility_annualizes_return_stddev() {
        // returns +10%, -10%: population sd 0.1
        let r = eval(volatility(), &[&[100.0, 110.0, 99.0]], &[2.0]);
        assert_series(&r.outputs()[0], &[0.1 * 252.0_f64.sqrt()], 1e-9);
    }

    #[test]
    fn vhf_trend_versus_chop() {
        let trend = eval(vhf(), &[&[1.0, 2.0, 3.0, 4.0]], &[3.0]);
        assert_eq!(trend.lookback(), 3);
        // spread of [2, 3, 4] over path 3
        assert_series(&trend.outputs()[0], &[2.0 / 3.0], DEFAULT_EPSILON);

        let chop = eval(vhf(), &[&[1.0, 2.0, 1.0, 2.0]], &[3.0]);
        assert_series(&chop.outputs()[0], &[1.0 / 3.0], DEFAULT_EPSILON);

        let flat = eval(vhf(), &[&[5.0; 4]], &[3.0]);
        assert_series(&flat.outputs()[0], &[0.0], DEFAULT_EPSILON);
    }
}

//! Moving-average oscillators.
//!
//! - `macd`: short EMA - long EMA, its signal EMA and the histogram between
//!   them. The 12/26 pair uses the fixed smoothing constants 0.15 and 0.075.
//! - `apo`: short EMA - long EMA.
//! - `ppo`: 100 * (short EMA - long EMA) / long EMA.
//! - `ao`: SMA(5) - SMA(34) of the bar midpoint (high + low) / 2.
//! - `dpo`: x[i - (period/2 + 1)] - SMA(period). Periods below 3 would reach
//!   before the first sample and are rejected.
//! - `ultosc`: Williams' ultimate oscillator. Buying pressure
//!   close - min(low, previous close) and the true range are summed over the
//!   three periods, and 100 * (4 * short + 2 * medium + long) / 7 of the
//!   pressure/range ratios is reported.
//!
//! All EMAs here are seeded with the first sample and start updating at the
//! second one.
//!
//! Lookback: macd long period - 1, apo/ppo 1, ao 33, dpo period - 1,
//! ultosc long period.

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, period_at_least, short_long_periods, OptionViolation};
use crate::series::{nan_min, rolling_sum, simple_average, true_range};

use super::{
    lookback_one, lookback_period_minus_one, HIGH_LOW, HIGH_LOW_CLOSE, PERIOD, REAL, SHORT_LONG,
};

fn alpha(p: usize) -> f64 {
    2.0 / (p as f64 + 1.0)
}

pub fn macd() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "macd",
        "Moving Average Convergence/Divergence",
        IndicatorKind::Indicator,
    )
    .fixed_inputs(REAL)
    .options(&["short period", "long period", "signal period"], check_macd)
    .outputs(&["macd", "macd_signal", "macd_histogram"])
    .lookback(macd_lookback)
    .compute(compute_macd)
}

fn check_macd(options: &[f64]) -> Result<(), OptionViolation> {
    short_long_periods(options)?;
    period_at_least(options, 2, 1)?;
    Ok(())
}

fn macd_lookback(options: &[f64]) -> usize {
    period(options, 1) - 1
}

fn compute_macd(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let (short, long, signal) = (period(options, 0), period(options, 1), period(options, 2));
    let (short_per, long_per) = if short == 12 && long == 26 {
        (0.15, 0.075)
    } else {
        (alpha(short), alpha(long))
    };
    let signal_per = alpha(signal);
    let start = long - 1;

    let mut short_ema = x[0];
    let mut long_ema = x[0];
    let mut signal_ema = 0.0;
    for i in 1..x.len() {
        short_ema = (x[i] - short_ema) * short_per + short_ema;
        long_ema = (x[i] - long_ema) * long_per + long_ema;
        let line = short_ema - long_ema;

        if i == start {
            signal_ema = line;
        }
        if i >= start {
            signal_ema = (line - signal_ema) * signal_per + signal_ema;
            let k = i - start;
            outputs[0][k] = line;
            outputs[1][k] = signal_ema;
            outputs[2][k] = line - signal_ema;
        }
    }
}

/// Short and long EMAs from the second sample on; element `k` is bar `k + 1`.
fn ema_pair(x: &[f64], options: &[f64]) -> Vec<(f64, f64)> {
    let short_per = alpha(period(options, 0));
    let long_per = alpha(period(options, 1));
    let mut short_ema = x[0];
    let mut long_ema = x[0];
    x[1..]
        .iter()
        .map(|&v| {
            short_ema = (v - short_ema) * short_per + short_ema;
            long_ema = (v - long_ema) * long_per + long_ema;
            (short_ema, long_ema)
        })
        .collect()
}

pub fn apo() -> DescriptorBuilder {
    IndicatorDescriptor::builder("apo", "Absolute Price Oscillator", IndicatorKind::Indicator)
        .fixed_inputs(REAL)
        .options(SHORT_LONG, short_long_periods)
        .outputs(&["apo"])
        .lookback(lookback_one)
        .compute(compute_apo)
}

fn compute_apo(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = ema_pair(inputs[0], options)
        .into_iter()
        .map(|(s, l)| s - l)
        .collect();
}

pub fn ppo() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "ppo",
        "Percentage Price Oscillator",
        IndicatorKind::Indicator,
    )
    .fixed_inputs(REAL)
    .options(SHORT_LONG, short_long_periods)
    .outputs(&["ppo"])
    .lookback(lookback_one)
    .compute(compute_ppo)
}

fn compute_ppo(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = ema_pair(inputs[0], options)
        .into_iter()
        .map(|(s, l)| 100.0 * (s - l) / l)
        .collect();
}

const AO_FAST: usize = 5;
const AO_SLOW: usize = 34;

pub fn ao() -> DescriptorBuilder {
    IndicatorDescriptor::builder("ao", "Awesome Oscillator", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW)
        .outputs(&["ao"])
        .lookback(|_| AO_SLOW - 1)
        .compute(compute_ao)
}

fn compute_ao(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    let midpoint: Vec<f64> = inputs[0]
        .iter()
        .zip(inputs[1])
        .map(|(h, l)| (h + l) * 0.5)
        .collect();
    let fast = simple_average(&midpoint, AO_FAST);
    let slow = simple_average(&midpoint, AO_SLOW);
    outputs[0] = slow
        .iter()
        .zip(&fast[AO_SLOW - AO_FAST..])
        .map(|(s, f)| f - s)
        .collect();
}

pub fn dpo() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "dpo",
        "Detrended Price Oscillator",
        IndicatorKind::Indicator,
    )
    .fixed_inputs(REAL)
    .options(PERIOD, check_dpo)
    .outputs(&["dpo"])
    .lookback(lookback_period_minus_one)
    .compute(compute_dpo)
}

fn check_dpo(options: &[f64]) -> Result<(), OptionViolation> {
    period_at_least(options, 0, 3).map(|_| ())
}

fn compute_dpo(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let x = inputs[0];
    let p = period(options, 0);
    let back = p / 2 + 1;
    // average k ends at bar k + p - 1
    for (k, avg) in simple_average(x, p).into_iter().enumerate() {
        outputs[0][k] = x[k + p - 1 - back] - avg;
    }
}

pub fn ultosc() -> DescriptorBuilder {
    IndicatorDescriptor::builder("ultosc", "Ultimate Oscillator", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE)
        .options(&["short period", "medium period", "long period"], check_ultosc)
        .outputs(&["ultosc"])
        .lookback(ultosc_lookback)
        .compute(compute_ultosc)
}

fn check_ultosc(options: &[f64]) -> Result<(), OptionViolation> {
    let short = period_at_least(options, 0, 1)?;
    let medium = period_at_least(options, 1, short)?;
    period_at_least(options, 2, medium)?;
    Ok(())
}

fn ultosc_lookback(options: &[f64]) -> usize {
    period(options, 2)
}

fn compute_ultosc(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let (high, low, close) = (inputs[0], inputs[1], inputs[2]);
    let periods = [period(options, 0), period(options, 1), period(options, 2)];
    let long = periods[2];

    // element j belongs to bar j + 1
    let (pressure, range): (Vec<f64>, Vec<f64>) = (1..close.len())
        .map(|i| {
            let floor = nan_min(low[i], close[i - 1]);
            (close[i] - floor, true_range(high[i], low[i], close[i - 1]))
        })
        .unzip();

    let ratios: Vec<Vec<f64>> = periods
        .iter()
        .map(|&p| {
            let bp = rolling_sum(&pressure, p);
            let tr = rolling_sum(&range, p);
            // drop the sums that end before bar `long`
            bp[long - p..]
                .iter()
                .zip(&tr[long - p..])
                .map(|(b, r)| b / r)
                .collect()
        })
        .collect();

    for (k, slot) in outputs[0].iter_mut().enumerate() {
        *slot = 100.0 * (4.0 * ratios[0][k] + 2.0 * ratios[1][k] + ratios[2][k]) / 7.0;
    }
}

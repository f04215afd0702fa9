//! Volume-weighted indicators.
//!
//! - `obv`: running total of volume, added on up closes and subtracted on down closes.
//! - `ad`: running total of ((close - low) - (high - close)) / (high - low) * volume;
//!   bars with no range add nothing.
//! - `adosc`: EMA(short) - EMA(long) of the `ad` line, both seeded with its first value.
//! - `mfi`: 100 * positive flow / total flow over `period` bars, where flow is
//!   typical price * volume signed by the typical price change; 50 when no
//!   flow moved.
//! - `kvo`: Klinger volume force, EMA(short) - EMA(long), both seeded with the
//!   first force value.
//! - `vosc`: 100 * (SMA(short) - SMA(long)) / SMA(long) of volume.
//! - `pvi`: starts at 1000 and moves by the close's percentage change on bars
//!   where volume rose.
//! - `emv`: change of the bar midpoint divided by the box ratio
//!   volume / 10000 / (high - low).
//! - `marketfi`: (high - low) / volume.
//! - `wad`: Williams accumulation/distribution. Up closes add the distance
//!   from min(low, previous close), down closes the distance from
//!   max(high, previous close).
//!
//! The running totals carry a NaN forward once one enters.
//!
//! Lookback: obv/ad/pvi/marketfi 0, adosc long period - 1, mfi period,
//! kvo/emv/wad 1, vosc long period - 1.

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{ordered_periods, period, single_period};
use crate::series::{nan_max, nan_min, rolling_sum, simple_average};

use super::rsi::strength;
use super::{
    lookback_one, lookback_period, lookback_zero, CLOSE_VOLUME, HIGH_LOW_CLOSE,
    HIGH_LOW_CLOSE_VOLUME, PERIOD, SHORT_LONG,
};

const HIGH_LOW_VOLUME: &[&str] = &["high", "low", "volume"];

fn lookback_long_minus_one(options: &[f64]) -> usize {
    period(options, 1) - 1
}

pub fn obv() -> DescriptorBuilder {
    IndicatorDescriptor::builder("obv", "On Balance Volume", IndicatorKind::Indicator)
        .fixed_inputs(CLOSE_VOLUME)
        .outputs(&["obv"])
        .lookback(lookback_zero)
        .compute(compute_obv)
}

fn compute_obv(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    let (close, volume) = (inputs[0], inputs[1]);
    let out = &mut outputs[0];

    let mut total = 0.0;
    let mut prev = close[0];
    for (i, (&c, &v)) in close.iter().zip(volume).enumerate() {
        if c.is_nan() || prev.is_nan() || v.is_nan() {
            total = f64::NAN;
        } else if c > prev {
            total += v;
        } else if c < prev {
            total -= v;
        }
        out[i] = total;
        prev = c;
    }
}

/// Accumulation/distribution line, one value per bar.
fn accumulation(high: &[f64], low: &[f64], close: &[f64], volume: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    (0..high.len())
        .map(|i| {
            let (h, l, c, v) = (high[i], low[i], close[i], volume[i]);
            if h.is_nan() || l.is_nan() || c.is_nan() || v.is_nan() {
                total = f64::NAN;
            } else if h != l {
                total += ((c - l) - (h - c)) / (h - l) * v;
            }
            total
        })
        .collect()
}

pub fn ad() -> DescriptorBuilder {
    IndicatorDescriptor::builder("ad", "Accumulation/Distribution Line", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE_VOLUME)
        .outputs(&["ad"])
        .lookback(lookback_zero)
        .compute(compute_ad)
}

fn compute_ad(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = accumulation(inputs[0], inputs[1], inputs[2], inputs[3]);
}

pub fn adosc() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "adosc",
        "Accumulation/Distribution Oscillator",
        IndicatorKind::Indicator,
    )
    .fixed_inputs(HIGH_LOW_CLOSE_VOLUME)
    .options(SHORT_LONG, ordered_periods)
    .outputs(&["adosc"])
    .lookback(lookback_long_minus_one)
    .compute(compute_adosc)
}

fn compute_adosc(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let line = accumulation(inputs[0], inputs[1], inputs[2], inputs[3]);
    let short_per = 2.0 / (period(options, 0) as f64 + 1.0);
    let long_per = 2.0 / (period(options, 1) as f64 + 1.0);
    let start = lookback_long_minus_one(options);

    let mut short_ema = line[0];
    let mut long_ema = line[0];
    for (i, &v) in line.iter().enumerate() {
        if i > 0 {
            short_ema = (v - short_ema) * short_per + short_ema;
            long_ema = (v - long_ema) * long_per + long_ema;
        }
        if i >= start {
            outputs[0][i - start] = short_ema - long_ema;
        }
    }
}

pub fn mfi() -> DescriptorBuilder {
    IndicatorDescriptor::builder("mfi", "Money Flow Index", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE_VOLUME)
        .options(PERIOD, single_period)
        .outputs(&["mfi"])
        .lookback(lookback_period)
        .compute(compute_mfi)
}

fn compute_mfi(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let volume = inputs[3];
    let typical: Vec<f64> = (0..volume.len())
        .map(|i| (inputs[0][i] + inputs[1][i] + inputs[2][i]) / 3.0)
        .collect();

    // flow j belongs to bar j + 1
    let (positive, negative): (Vec<f64>, Vec<f64>) = (1..typical.len())
        .map(|i| {
            let (now, prev) = (typical[i], typical[i - 1]);
            let flow = now * volume[i];
            if now.is_nan() || prev.is_nan() || flow.is_nan() {
                (f64::NAN, f64::NAN)
            } else if now > prev {
                (flow, 0.0)
            } else if now < prev {
                (0.0, flow)
            } else {
                (0.0, 0.0)
            }
        })
        .unzip();

    let up = rolling_sum(&positive, p);
    let down = rolling_sum(&negative, p);
    outputs[0] = up.iter().zip(&down).map(|(u, d)| strength(*u, *d)).collect();
}

pub fn kvo() -> DescriptorBuilder {
    IndicatorDescriptor::builder("kvo", "Klinger Volume Oscillator", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_CLOSE_VOLUME)
        .options(SHORT_LONG, ordered_periods)
        .outputs(&["kvo"])
        .lookback(lookback_one)
        .compute(compute_kvo)
}

fn compute_kvo(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let (high, low, close, volume) = (inputs[0], inputs[1], inputs[2], inputs[3]);
    let short_per = 2.0 / (period(options, 0) as f64 + 1.0);
    let long_per = 2.0 / (period(options, 1) as f64 + 1.0);
    let out = &mut outputs[0];

    let mut prev_hlc = high[0] + low[0] + close[0];
    // None until the first change of hlc
    let mut up_trend: Option<bool> = None;
    let mut cm = 0.0;
    let (mut short_ema, mut long_ema) = (0.0, 0.0);
    for i in 1..high.len() {
        let hlc = high[i] + low[i] + close[i];
        let dm = high[i] - low[i];
        // a trend flip restarts the cumulative measurement from the previous bar
        if hlc > prev_hlc && up_trend != Some(true) {
            up_trend = Some(true);
            cm = high[i - 1] - low[i - 1];
        } else if hlc < prev_hlc && up_trend != Some(false) {
            up_trend = Some(false);
            cm = high[i - 1] - low[i - 1];
        }
        cm += dm;

        let sign = if up_trend == Some(false) { -1.0 } else { 1.0 };
        let force = if hlc.is_nan() || prev_hlc.is_nan() {
            f64::NAN
        } else {
            volume[i] * (dm / cm * 2.0 - 1.0).abs() * 100.0 * sign
        };
        if i == 1 {
            short_ema = force;
            long_ema = force;
        } else {
            short_ema = (force - short_ema) * short_per + short_ema;
            long_ema = (force - long_ema) * long_per + long_ema;
        }
        out[i - 1] = short_ema - long_ema;
        prev_hlc = hlc;
    }
}

pub fn vosc() -> DescriptorBuilder {
    IndicatorDescriptor::builder("vosc", "Volume Oscillator", IndicatorKind::Indicator)
        .fixed_inputs(&["volume"])
        .options(SHORT_LONG, ordered_periods)
        .outputs(&["vosc"])
        .lookback(lookback_long_minus_one)
        .compute(compute_vosc)
}

fn compute_vosc(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let (short, long) = (period(options, 0), period(options, 1));
    let fast = simple_average(inputs[0], short);
    let slow = simple_average(inputs[0], long);
    outputs[0] = fast[long - short..]
        .iter()
        .zip(&slow)
        .map(|(s, l)| 100.0 * (s - l) / l)
        .collect();
}

pub fn pvi() -> DescriptorBuilder {
    IndicatorDescriptor::builder("pvi", "Positive Volume Index", IndicatorKind::Indicator)
        .fixed_inputs(CLOSE_VOLUME)
        .outputs(&["pvi"])
        .lookback(lookback_zero)
        .compute(compute_pvi)
}

fn compute_pvi(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    let (close, volume) = (inputs[0], inputs[1]);
    let out = &mut outputs[0];

    let mut index = if close[0].is_nan() || volume[0].is_nan() {
        f64::NAN
    } else {
        1000.0
    };
    out[0] = index;
    for i in 1..close.len() {
        if close[i].is_nan() || volume[i].is_nan() {
            index = f64::NAN;
        } else if volume[i] > volume[i - 1] {
            index += (close[i] - close[i - 1]) / close[i - 1] * index;
        }
        out[i] = index;
    }
}

pub fn emv() -> DescriptorBuilder {
    IndicatorDescriptor::builder("emv", "Ease of Movement", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_VOLUME)
        .outputs(&["emv"])
        .lookback(lookback_one)
        .compute(compute_emv)
}

fn compute_emv(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    let (high, low, volume) = (inputs[0], inputs[1], inputs[2]);
    let mut last = (high[0] + low[0]) * 0.5;
    for i in 1..high.len() {
        let mid = (high[i] + low[i]) * 0.5;
        let box_ratio = volume[i] / 10000.0 / (high[i] - low[i]);
        outputs[0][i - 1] = (mid - last) / box_ratio;
        last = mid;
    }
}

pub fn marketfi() -> DescriptorBuilder {
    IndicatorDescriptor::builder("marketfi", "Market Facilitation Index", IndicatorKind::Indicator)
        .fixed_inputs(HIGH_LOW_VOLUME)
        .outputs(&["marketfi"])
        .lookback(lookback_zero)
        .compute(compute_marketfi)
}

fn compute_marketfi(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    let (high, low, volume) = (inputs[0], inputs[1], inputs[2]);
    for (i, slot) in outputs[0].iter_mut().enumerate() {
        *slot = (high[i] - low[i]) / volume[i];
    }
}

pub fn wad() -> DescriptorBuilder {
    IndicatorDescriptor::builder(
        "wad",
        "Williams Accumulation/Distribution",
        IndicatorKind::Indicator,
    )
    .fixed_inputs(HIGH_LOW_CLOSE)
    .outputs(&["wad"])
    .lookback(lookback_one)
    .compute(compute_wad)
}

fn compute_wad(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    let (high, low, close) = (inputs[0], inputs[1], inputs[2]);
    let mut total = 0.0;
    for i in 1..close.len() {
        let (c, prev) = (close[i], close[i - 1]);
        if c.is_nan() || prev.is_nan() {
            total = f64::NAN;
        } else if c > prev {
            total += c - nan_min(prev, low[i]);
        } else if c < prev {
            total += c - nan_max(prev, high[i]);
        }
        outputs[0][i - 1] = total;
    }
}

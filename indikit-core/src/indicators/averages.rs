//! Window-weighted moving averages.
//!
//! - `sma`: arithmetic mean of the last `period` samples.
//! - `wma`: linear weights 1..=period, newest heaviest.
//! - `trima`: triangular weights min(j+1, period-j).
//! - `hma`: Hull, wma(2*wma(x, period/2) - wma(x, period), floor(sqrt(period))).
//! - `wilders`: Wilder smoothing (alpha = 1/period) seeded with the first window mean.
//! - `vwma`: sum(close*volume) / sum(volume).
//!
//! Lookback: period - 1, except hma: period + floor(sqrt(period)) - 2.

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{period, single_period, single_period_min2};
use crate::series::{rolling_sum, simple_average, weighted_average};

use super::{lookback_period_minus_one, CLOSE_VOLUME, PERIOD, REAL};

pub fn sma() -> DescriptorBuilder {
    IndicatorDescriptor::builder("sma", "Simple Moving Average", IndicatorKind::Overlay)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["sma"])
        .lookback(lookback_period_minus_one)
        .compute(compute_sma)
}

fn compute_sma(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = simple_average(inputs[0], period(options, 0));
}

pub fn wma() -> DescriptorBuilder {
    IndicatorDescriptor::builder("wma", "Weighted Moving Average", IndicatorKind::Overlay)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["wma"])
        .lookback(lookback_period_minus_one)
        .compute(compute_wma)
}

fn compute_wma(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    outputs[0] = weighted_average(inputs[0], period(options, 0));
}

pub fn trima() -> DescriptorBuilder {
    IndicatorDescriptor::builder("trima", "Triangular Moving Average", IndicatorKind::Overlay)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["trima"])
        .lookback(lookback_period_minus_one)
        .compute(compute_trima)
}

fn compute_trima(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let weights: Vec<f64> = (0..p).map(|j| (j + 1).min(p - j) as f64).collect();
    let total: f64 = weights.iter().sum();
    outputs[0] = inputs[0]
        .windows(p)
        .map(|w| w.iter().zip(&weights).map(|(v, wt)| v * wt).sum::<f64>() / total)
        .collect();
}

fn sqrt_floor(p: usize) -> usize {
    (p as f64).sqrt() as usize
}

pub fn hma() -> DescriptorBuilder {
    IndicatorDescriptor::builder("hma", "Hull Moving Average", IndicatorKind::Overlay)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period_min2)
        .outputs(&["hma"])
        .lookback(hma_lookback)
        .compute(compute_hma)
}

fn hma_lookback(options: &[f64]) -> usize {
    let p = period(options, 0);
    p + sqrt_floor(p) - 2
}

fn compute_hma(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let half = p / 2;
    let full = weighted_average(inputs[0], p);
    let short = weighted_average(inputs[0], half);

    // full[k] covers input index k + p - 1, short[k + p - half] the same index.
    let offset = p - half;
    let diff: Vec<f64> = full
        .iter()
        .enumerate()
        .map(|(k, f)| 2.0 * short[k + offset] - f)
        .collect();

    outputs[0] = weighted_average(&diff, sqrt_floor(p));
}

pub fn wilders() -> DescriptorBuilder {
    IndicatorDescriptor::builder("wilders", "Wilders Smoothing", IndicatorKind::Overlay)
        .fixed_inputs(REAL)
        .options(PERIOD, single_period)
        .outputs(&["wilders"])
        .lookback(lookback_period_minus_one)
        .compute(compute_wilders)
}

fn compute_wilders(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let x = inputs[0];
    let out = &mut outputs[0];
    let per = 1.0 / p as f64;

    let mut val = x[..p].iter().sum::<f64>() / p as f64;
    out[0] = val;
    for i in p..x.len() {
        val = (x[i] - val) * per + val;
        out[i + 1 - p] = val;
    }
}

pub fn vwma() -> DescriptorBuilder {
    IndicatorDescriptor::builder("vwma", "Volume Weighted Moving Average", IndicatorKind::Overlay)
        .fixed_inputs(CLOSE_VOLUME)
        .options(PERIOD, single_period)
        .outputs(&["vwma"])
        .lookback(lookback_period_minus_one)
        .compute(compute_vwma)
}

fn compute_vwma(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let p = period(options, 0);
    let (close, volume) = (inputs[0], inputs[1]);
    let weighted: Vec<f64> = close.iter().zip(volume).map(|(c, v)| c * v).collect();
    let numerator = rolling_sum(&weighted, p);
    let denominator = rolling_sum(volume, p);
    outputs[0] = numerator
        .iter()
        .zip(&denominator)
        .map(|(n, d)| n / d)
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, assert_series, eval, DEFAULT_EPSILON};

    #[test]
    fn sma_3_on_one_to_five() {
        let r = eval(sma(), &[&[1.0, 2.0, 3.0, 4.0, 5.0]], &[3.0]);
        assert_eq!(r.lookback(), 2);
        assert_eq!(r.outputs()[0], vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn sma_1_is_identity() {
        let r = eval(sma(), &[&[100.0, 200.0, 300.0]], &[1.0]);
        assert_eq!(r.lookback(), 0);
        assert_eq!(r.outputs()[0], vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn sma_nan_only_taints_its_windows() {
        let x = [10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0];
        let r = eval(sma(), &[&x], &[3.0]);
        // windows end at 2..=5; the NaN at 2 is in the first three
        assert_series(&r.outputs()[0], &[f64::NAN, f64::NAN, f64::NAN, 14.0], DEFAULT_EPSILON);
    }

    #[test]
    fn wma_weights() {
        // (1*1 + 2*2 + 3*3) / 6 and (1*2 + 2*3 + 3*4) / 6
        let r = eval(wma(), &[&[1.0, 2.0, 3.0, 4.0]], &[3.0]);
        assert_series(&r.outputs()[0], &[14.0 / 6.0, 20.0 / 6.0], DEFAULT_EPSILON);
    }

    #[test]
    fn trima_even_period_weights() {
        // weights 1,2,2,1 over 6
        let r = eval(trima(), &[&[1.0, 2.0, 3.0, 4.0]], &[4.0]);
        assert_approx(r.outputs()[0][0], (1.0 + 4.0 + 6.0 + 4.0) / 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn hma_tracks_a_straight_line() {
        // Every WMA of a linear series is linear, so HMA of a line lands on the line.
        let x: Vec<f64> = (0..20).map(|i| 2.0 * i as f64 + 1.0).collect();
        let r = eval(hma(), &[&x], &[4.0]);
        assert_eq!(r.lookback(), 4);
        assert_eq!(r.len(), 16);
        for (k, v) in r.outputs()[0].iter().enumerate() {
            let i = r.input_index(k);
            assert_approx(*v, x[i], 1e-9);
        }
    }

    #[test]
    fn hma_rejects_period_one() {
        let d = hma().build().unwrap();
        assert!(d.lookback(&[1.0]).is_err());
    }

    #[test]
    fn wilders_seed_and_smoothing() {
        // seed mean(1,2,3) = 2; next (4 - 2) / 3 + 2
        let r = eval(wilders(), &[&[1.0, 2.0, 3.0, 4.0]], &[3.0]);
        assert_series(&r.outputs()[0], &[2.0, 2.0 + 2.0 / 3.0], DEFAULT_EPSILON);
    }

    #[test]
    fn vwma_weights_by_volume() {
        let close = [10.0, 20.0, 30.0];
        let volume = [1.0, 3.0, 0.0];
        let r = eval(vwma(), &[&close, &volume], &[2.0]);
        // (10 + 60) / 4, (60 + 0) / 3
        assert_series(&r.outputs()[0], &[17.5, 20.0], DEFAULT_EPSILON);
    }
}

//! Built-in indicator catalog.
//!
//! Each submodule exposes one constructor per indicator returning a
//! [`DescriptorBuilder`]; [`builtin`] collects them all for the registry.
//! Formulas, lookbacks and option names follow the Tulip Indicators library.
//!
//! Compute functions rely on the driver's guarantees: options are validated,
//! all inputs share one length `n`, `n > lookback`, and every output buffer has
//! `n - lookback` NaN-filled slots.

pub mod aroon;
pub mod averages;
pub mod bands;
pub mod cci;
pub mod crossing;
pub mod decay;
pub mod directional;
pub mod exponential;
pub mod fisher;
pub mod kama;
pub mod math;
pub mod momentum;
pub mod msw;
pub mod oscillators;
pub mod price;
pub mod psar;
pub mod range;
pub mod rsi;
pub mod statistics;
pub mod stochastic;
pub mod volume;

use crate::descriptor::DescriptorBuilder;
use crate::options::period;

pub(crate) const REAL: &[&str] = &["real"];
pub(crate) const PERIOD: &[&str] = &["period"];
pub(crate) const HIGH_LOW: &[&str] = &["high", "low"];
pub(crate) const HIGH_LOW_CLOSE: &[&str] = &["high", "low", "close"];
pub(crate) const HIGH_LOW_CLOSE_VOLUME: &[&str] = &["high", "low", "close", "volume"];
pub(crate) const CLOSE_VOLUME: &[&str] = &["close", "volume"];
pub(crate) const SHORT_LONG: &[&str] = &["short period", "long period"];

pub(crate) fn lookback_zero(_options: &[f64]) -> usize {
    0
}

pub(crate) fn lookback_one(_options: &[f64]) -> usize {
    1
}

pub(crate) fn lookback_period(options: &[f64]) -> usize {
    period(options, 0)
}

pub(crate) fn lookback_period_minus_one(options: &[f64]) -> usize {
    period(options, 0) - 1
}

/// Every built-in indicator, in no particular order.
pub fn builtin() -> Vec<DescriptorBuilder> {
    let mut all = Vec::new();
    all.extend(math::all());
    all.extend(crossing::all());
    all.extend(price::all());
    all.extend([
        averages::sma(),
        averages::wma(),
        averages::trima(),
        averages::hma(),
        averages::wilders(),
        averages::vwma(),
        exponential::ema(),
        exponential::dema(),
        exponential::tema(),
        exponential::trix(),
        exponential::zlema(),
        exponential::vidya(),
        decay::decay(),
        decay::edecay(),
        kama::kama(),
        bands::bbands(),
        psar::psar(),
        statistics::stddev(),
        statistics::var(),
        statistics::stderr(),
        statistics::md(),
        statistics::sum(),
        statistics::max(),
        statistics::min(),
        statistics::lag(),
        statistics::linreg(),
        statistics::linregintercept(),
        statistics::linregslope(),
        statistics::tsf(),
        statistics::fosc(),
        statistics::volatility(),
        statistics::vhf(),
        momentum::mom(),
        momentum::roc(),
        momentum::rocr(),
        momentum::cmo(),
        rsi::rsi(),
        rsi::stochrsi(),
        range::tr(),
        range::atr(),
        range::natr(),
        range::cvi(),
        range::mass(),
        oscillators::macd(),
        oscillators::apo(),
        oscillators::ppo(),
        oscillators::ao(),
        oscillators::dpo(),
        oscillators::ultosc(),
        stochastic::stoch(),
        stochastic::willr(),
        cci::cci(),
        aroon::aroon(),
        aroon::aroonosc(),
        directional::dm(),
        directional::di(),
        directional::dx(),
        directional::adx(),
        volume::obv(),
        volume::ad(),
        volume::adosc(),
        volume::mfi(),
        volume::kvo(),
        volume::vosc(),
        volume::pvi(),
        volume::emv(),
        volume::marketfi(),
        volume::wad(),
        fisher::fisher(),
        msw::msw(),
    ]);
    all
}

/// Build a descriptor and evaluate it, panicking on any error.
#[cfg(test)]
pub(crate) fn eval(
    builder: DescriptorBuilder,
    inputs: &[&[f64]],
    options: &[f64],
) -> crate::driver::EvaluationResult {
    let descriptor = builder.build().expect("descriptor builds");
    crate::driver::evaluate(&descriptor, inputs, options).expect("evaluation succeeds")
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Assert two series match element-wise; NaN only matches NaN.
#[cfg(test)]
pub(crate) fn assert_series(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch: actual={actual:?}, expected={expected:?}"
    );
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        if e.is_nan() {
            assert!(a.is_nan(), "expected NaN at {i}, got {a}");
        } else {
            assert!(
                (a - e).abs() < epsilon,
                "mismatch at {i}: actual={a}, expected={e}"
            );
        }
    }
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-10;

//! Shared fixtures for integration tests.
//!
//! Inputs and options are chosen by *name*, so any catalog descriptor can be
//! evaluated without per-indicator setup.

#![allow(dead_code)]

use indikit_core::{IndicatorDescriptor, Series};

/// A reasonable value for every option name used by the built-in catalog.
pub fn default_option(name: &str) -> f64 {
    match name {
        "period" => 5.0,
        "stddev" => 2.0,
        "short period" => 3.0,
        "medium period" => 5.0,
        "long period" => 8.0,
        "alpha" => 0.2,
        "signal period" => 4.0,
        "%k period" => 5.0,
        "%k slowing period" => 3.0,
        "%d period" => 3.0,
        "acceleration factor step" => 0.02,
        "acceleration factor maximum" => 0.2,
        other => panic!("no default for option '{other}'"),
    }
}

pub fn default_options(d: &IndicatorDescriptor) -> Vec<f64> {
    d.option_names().iter().map(|n| default_option(n)).collect()
}

fn close_at(i: usize) -> f64 {
    let t = i as f64;
    100.0 + 10.0 * (0.3 * t).sin() + 0.05 * t
}

fn open_at(i: usize) -> f64 {
    close_at(i) - 0.4 * (0.7 * i as f64).cos()
}

/// Deterministic sample series for an input name. High/low bracket
/// open/close; `real` stays inside (0, 1) so every math function is defined.
pub fn sample_input(name: &str, n: usize) -> Series {
    (0..n)
        .map(|i| {
            let t = i as f64;
            match name {
                "close" => close_at(i),
                "open" => open_at(i),
                "high" => close_at(i).max(open_at(i)) + 1.0 + 0.3 * t.sin().powi(2),
                "low" => close_at(i).min(open_at(i)) - 1.0 - 0.2 * t.cos().powi(2),
                "volume" => 1000.0 + 300.0 * (0.5 * t).sin().abs(),
                "real" => 0.5 + 0.4 * (0.37 * t).sin(),
                other => panic!("no sample for input '{other}'"),
            }
        })
        .collect()
}

/// One sample series per declared input name.
pub fn sample_inputs(d: &IndicatorDescriptor, n: usize) -> Vec<Series> {
    d.input_names().iter().map(|name| sample_input(name, n)).collect()
}

pub fn as_slices(inputs: &[Series]) -> Vec<&[f64]> {
    inputs.iter().map(Vec::as_slice).collect()
}

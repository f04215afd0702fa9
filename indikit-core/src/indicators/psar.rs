//! Parabolic SAR: Wilder's acceleration factor system.
//!
//! Inherently sequential/stateful: maintains direction, extreme point (EP),
//! and acceleration factor (AF). The AF starts at the step, grows by the step
//! on every new extreme up to the maximum, and resets on reversal.
//! The initial direction is long when the second bar's midpoint is not below
//! the first one's.
//!
//! Options: acceleration factor step (> 0), acceleration factor maximum (>= step).
//! Lookback: 1 (needs at least 2 bars to start).

use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor, IndicatorKind};
use crate::options::{positive, OptionViolation};

use super::HIGH_LOW;

pub fn psar() -> DescriptorBuilder {
    IndicatorDescriptor::builder("psar", "Parabolic SAR", IndicatorKind::Overlay)
        .fixed_inputs(HIGH_LOW)
        .options(
            &["acceleration factor step", "acceleration factor maximum"],
            check_psar,
        )
        .outputs(&["psar"])
        .lookback(|_| 1)
        .compute(compute_psar)
}

fn check_psar(options: &[f64]) -> Result<(), OptionViolation> {
    let step = positive(options, 0)?;
    let max = positive(options, 1)?;
    if max < step {
        return Err(OptionViolation::new(
            1,
            max,
            "must not be smaller than the step",
        ));
    }
    Ok(())
}

fn compute_psar(inputs: &[&[f64]], options: &[f64], outputs: &mut [Vec<f64>]) {
    let (high, low) = (inputs[0], inputs[1]);
    let (step, max) = (options[0], options[1]);
    let out = &mut outputs[0];

    let mut is_long = high[0] + low[0] <= high[1] + low[1];
    let (mut extreme, mut sar) = if is_long {
        (high[0], low[0])
    } else {
        (low[0], high[0])
    };
    let mut af = step;
    let mut poisoned = high[0].is_nan() || low[0].is_nan();

    for i in 1..high.len() {
        if poisoned || high[i].is_nan() || low[i].is_nan() {
            // No direction can be recovered once a bar is undefined
            poisoned = true;
            out[i - 1] = f64::NAN;
            continue;
        }

        sar += af * (extreme - sar);

        if is_long {
            // In uptrend: SAR must not be above the two previous lows
            if i >= 2 && sar > low[i - 2] {
                sar = low[i - 2];
            }
            if sar > low[i - 1] {
                sar = low[i - 1];
            }
            if high[i] > extreme {
                extreme = high[i];
                af = (af + step).min(max);
            }
        } else {
            // In downtrend: SAR must not be below the two previous highs
            if i >= 2 && sar < high[i - 2] {
                sar = high[i - 2];
            }
            if sar < high[i - 1] {
                sar = high[i - 1];
            }
            if low[i] < extreme {
                extreme = low[i];
                af = (af + step).min(max);
            }
        }

        // Reversal: SAR jumps to the prior extreme
        if (is_long && low[i] < sar) || (!is_long && high[i] > sar) {
            is_long = !is_long;
            af = step;
            sar = extreme;
            extreme = if is_long { high[i] } else { low[i] };
        }

        out[i - 1] = sar;
    }
}

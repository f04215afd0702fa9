//! Option validation.
//!
//! Every descriptor carries an [`OptionCheckFn`]. The driver calls it after the
//! option count has been verified and before the lookback is computed, so
//! lookback and compute functions may read options with [`period`] without
//! re-validating.

/// Largest accepted value for a period-like option.
pub const MAX_PERIOD: f64 = u32::MAX as f64;

/// A single rejected option value. The driver turns this into
/// [`EngineError::InvalidOption`](crate::EngineError::InvalidOption) using the
/// descriptor's option name at `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionViolation {
    pub index: usize,
    pub value: f64,
    pub reason: String,
}

impl OptionViolation {
    pub fn new(index: usize, value: f64, reason: impl Into<String>) -> Self {
        Self {
            index,
            value,
            reason: reason.into(),
        }
    }
}

/// Validates the option values of one indicator.
pub type OptionCheckFn = fn(&[f64]) -> Result<(), OptionViolation>;

fn value_at(options: &[f64], index: usize) -> Result<f64, OptionViolation> {
    match options.get(index) {
        Some(&v) if v.is_finite() => Ok(v),
        Some(&v) => Err(OptionViolation::new(index, v, "must be finite")),
        None => Err(OptionViolation::new(index, f64::NAN, "missing")),
    }
}

/// Validates a whole-number period option with a lower bound.
pub fn period_at_least(
    options: &[f64],
    index: usize,
    min: usize,
) -> Result<usize, OptionViolation> {
    let value = value_at(options, index)?;
    if value.fract() != 0.0 {
        return Err(OptionViolation::new(index, value, "must be a whole number"));
    }
    if value < min as f64 {
        return Err(OptionViolation::new(
            index,
            value,
            format!("must be at least {min}"),
        ));
    }
    if value > MAX_PERIOD {
        return Err(OptionViolation::new(
            index,
            value,
            format!("must not exceed {MAX_PERIOD}"),
        ));
    }
    Ok(value as usize)
}

/// Validates a finite real option.
pub fn finite(options: &[f64], index: usize) -> Result<f64, OptionViolation> {
    value_at(options, index)
}

/// Validates a strictly positive real option.
pub fn positive(options: &[f64], index: usize) -> Result<f64, OptionViolation> {
    let value = value_at(options, index)?;
    if value <= 0.0 {
        return Err(OptionViolation::new(index, value, "must be positive"));
    }
    Ok(value)
}

/// Validates a real option in `[0, 1]`.
pub fn unit_interval(options: &[f64], index: usize) -> Result<f64, OptionViolation> {
    let value = value_at(options, index)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(OptionViolation::new(index, value, "must be between 0 and 1"));
    }
    Ok(value)
}

/// Reads a period option that has already passed validation.
pub fn period(options: &[f64], index: usize) -> usize {
    options[index] as usize
}

pub fn no_options(_options: &[f64]) -> Result<(), OptionViolation> {
    Ok(())
}

/// One `period` option, at least 1.
pub fn single_period(options: &[f64]) -> Result<(), OptionViolation> {
    period_at_least(options, 0, 1).map(|_| ())
}

/// One `period` option, at least 2.
pub fn single_period_min2(options: &[f64]) -> Result<(), OptionViolation> {
    period_at_least(options, 0, 2).map(|_| ())
}

/// `short period` >= 1, `long period` >= 2 and not shorter than the short one.
pub fn short_long_periods(options: &[f64]) -> Result<(), OptionViolation> {
    let short = period_at_least(options, 0, 1)?;
    let long = period_at_least(options, 1, 2)?;
    if long < short {
        return Err(OptionViolation::new(
            1,
            options[1],
            "must not be shorter than the short period",
        ));
    }
    Ok(())
}

/// `short period` >= 1 and `long period` not shorter than it.
pub fn ordered_periods(options: &[f64]) -> Result<(), OptionViolation> {
    let short = period_at_least(options, 0, 1)?;
    period_at_least(options, 1, short)?;
    Ok(())
}

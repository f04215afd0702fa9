//! Evaluation driver: validates a call against a descriptor, allocates the
//! output buffers and runs the compute function.
//!
//! Output sample `k` of every series lines up with input sample `k + lookback`.

use serde::Serialize;
use tracing::debug;

use crate::descriptor::IndicatorDescriptor;
use crate::error::{ArityKind, EngineError};

/// An ordered sequence of samples on a time axis.
pub type Series = Vec<f64>;

/// Outputs of one evaluation plus the lookback that was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    lookback: usize,
    output_names: &'static [&'static str],
    outputs: Vec<Series>,
}

impl EvaluationResult {
    /// Leading input samples consumed before the first output sample.
    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn output_names(&self) -> &'static [&'static str] {
        self.output_names
    }

    pub fn outputs(&self) -> &[Series] {
        &self.outputs
    }

    pub fn output(&self, index: usize) -> Option<&[f64]> {
        self.outputs.get(index).map(|s| s.as_slice())
    }

    pub fn output_named(&self, name: &str) -> Option<&[f64]> {
        self.output_names
            .iter()
            .position(|n| *n == name)
            .and_then(|i| self.output(i))
    }

    /// Samples per output series.
    pub fn len(&self) -> usize {
        self.outputs.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Input index that output sample `k` corresponds to.
    pub fn input_index(&self, k: usize) -> usize {
        k + self.lookback
    }

    /// Outputs re-aligned to the input axis: `lookback` leading NaNs, then the samples.
    pub fn padded(&self) -> Vec<Series> {
        self.outputs
            .iter()
            .map(|s| {
                let mut padded = Vec::with_capacity(self.lookback + s.len());
                padded.resize(self.lookback, f64::NAN);
                padded.extend_from_slice(s);
                padded
            })
            .collect()
    }

    pub fn into_outputs(self) -> Vec<Series> {
        self.outputs
    }
}

/// Evaluates `descriptor` on `inputs` with `options`.
///
/// Fails without running the compute function when the input or option count
/// disagrees with the descriptor, an option value is invalid, the inputs differ
/// in length, or the inputs are not longer than the lookback.
pub fn evaluate(
    descriptor: &IndicatorDescriptor,
    inputs: &[&[f64]],
    options: &[f64],
) -> Result<EvaluationResult, EngineError> {
    let name = descriptor.name();

    let arity = descriptor.input_arity();
    if !arity.accepts(inputs.len()) {
        return Err(EngineError::ArityMismatch {
            indicator: name.to_string(),
            what: ArityKind::Inputs,
            expected: arity.to_string(),
            actual: inputs.len(),
        });
    }

    descriptor.check_options(options)?;

    let len = inputs.first().map_or(0, |s| s.len());
    if let Some(other) = inputs.iter().find(|s| s.len() != len) {
        return Err(EngineError::LengthMismatch {
            indicator: name.to_string(),
            expected: len,
            actual: other.len(),
        });
    }

    let lookback = descriptor.lookback_unchecked(options);
    let required = lookback.saturating_add(1);
    if len < required {
        return Err(EngineError::InsufficientData {
            indicator: name.to_string(),
            required,
            actual: len,
        });
    }

    let out_len = len - lookback;
    let mut outputs = vec![vec![f64::NAN; out_len]; descriptor.output_count()];
    (descriptor.compute_fn())(inputs, options, &mut outputs);
    debug_assert!(
        outputs.iter().all(|o| o.len() == out_len),
        "{name}: compute produced a series of the wrong length"
    );

    debug!(
        indicator = name,
        inputs = inputs.len(),
        samples = len,
        lookback,
        outputs = outputs.len(),
        "indicator evaluated"
    );

    Ok(EvaluationResult {
        lookback,
        output_names: descriptor.output_names(),
        outputs,
    })
}

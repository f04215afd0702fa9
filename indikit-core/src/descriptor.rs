//! Indicator descriptors: immutable metadata plus the lookback and compute functions.
//!
//! Descriptors are only obtainable through [`DescriptorBuilder::build`], which
//! checks the shape invariants (name lists agree with the declared counts).
//! A descriptor that exists is therefore well formed, and its accessors are
//! plain reads.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{ArityKind, EngineError};
use crate::options::OptionCheckFn;

/// Number of leading input samples consumed before the first output sample,
/// as a function of already validated option values.
pub type LookbackFn = fn(&[f64]) -> usize;

/// Fills pre-sized output buffers from input series and validated options.
///
/// Called by the driver only when every input has the same length `n` with
/// `n > lookback(options)`. Each `outputs[k]` has length `n - lookback(options)`
/// and is pre-filled with NaN.
pub type ComputeFn = fn(&[&[f64]], &[f64], &mut [Vec<f64>]);

/// Display category, following the grouping of the Tulip Indicators catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// Plotted on the price axis (moving averages, bands, SAR).
    Overlay,
    /// Plotted in its own pane (oscillators, volume lines).
    Indicator,
    /// Rolling statistics over a window.
    Math,
    /// Element-wise vector math.
    Simple,
    /// Crossing detection between two series.
    Comparative,
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndicatorKind::Overlay => "overlay",
            IndicatorKind::Indicator => "indicator",
            IndicatorKind::Math => "math",
            IndicatorKind::Simple => "simple",
            IndicatorKind::Comparative => "comparative",
        };
        f.write_str(s)
    }
}

/// Declared input count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    Fixed(usize),
    Variable { min: usize },
}

impl Arity {
    /// Whether `count` input series satisfy this arity.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Fixed(n) => count == n,
            Arity::Variable { min } => count >= min,
        }
    }

    /// Number of names the descriptor must declare for this arity.
    pub fn declared(&self) -> usize {
        match *self {
            Arity::Fixed(n) => n,
            Arity::Variable { min } => min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{n}"),
            Arity::Variable { min } => write!(f, "at least {min}"),
        }
    }
}

/// Immutable description of one indicator.
#[derive(Clone)]
pub struct IndicatorDescriptor {
    name: &'static str,
    full_name: &'static str,
    kind: IndicatorKind,
    input_arity: Arity,
    input_names: &'static [&'static str],
    option_names: &'static [&'static str],
    output_names: &'static [&'static str],
    check_options: OptionCheckFn,
    lookback: LookbackFn,
    compute: ComputeFn,
}

impl fmt::Debug for IndicatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicatorDescriptor")
            .field("name", &self.name)
            .field("full_name", &self.full_name)
            .field("kind", &self.kind)
            .field("input_arity", &self.input_arity)
            .field("input_names", &self.input_names)
            .field("option_names", &self.option_names)
            .field("output_names", &self.output_names)
            .finish_non_exhaustive()
    }
}

impl IndicatorDescriptor {
    pub fn builder(
        name: &'static str,
        full_name: &'static str,
        kind: IndicatorKind,
    ) -> DescriptorBuilder {
        DescriptorBuilder::new(name, full_name, kind)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn full_name(&self) -> &'static str {
        self.full_name
    }

    pub fn kind(&self) -> IndicatorKind {
        self.kind
    }

    pub fn input_arity(&self) -> Arity {
        self.input_arity
    }

    pub fn option_count(&self) -> usize {
        self.option_names.len()
    }

    pub fn output_count(&self) -> usize {
        self.output_names.len()
    }

    pub fn input_names(&self) -> &'static [&'static str] {
        self.input_names
    }

    pub fn option_names(&self) -> &'static [&'static str] {
        self.option_names
    }

    pub fn output_names(&self) -> &'static [&'static str] {
        self.output_names
    }

    /// Validates option count and values.
    pub fn check_options(&self, options: &[f64]) -> Result<(), EngineError> {
        if options.len() != self.option_count() {
            return Err(EngineError::ArityMismatch {
                indicator: self.name.to_string(),
                what: ArityKind::Options,
                expected: self.option_count().to_string(),
                actual: options.len(),
            });
        }
        (self.check_options)(options).map_err(|v| EngineError::InvalidOption {
            indicator: self.name.to_string(),
            option: self
                .option_names
                .get(v.index)
                .copied()
                .unwrap_or("?")
                .to_string(),
            value: v.value,
            reason: v.reason,
        })
    }

    /// Lookback for the given options, after validating them.
    pub fn lookback(&self, options: &[f64]) -> Result<usize, EngineError> {
        self.check_options(options)?;
        Ok((self.lookback)(options))
    }

    pub(crate) fn lookback_unchecked(&self, options: &[f64]) -> usize {
        (self.lookback)(options)
    }

    pub(crate) fn compute_fn(&self) -> ComputeFn {
        self.compute
    }

    /// Owned, serializable copy of the metadata.
    pub fn info(&self) -> IndicatorInfo {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        IndicatorInfo {
            name: self.name.to_string(),
            full_name: self.full_name.to_string(),
            kind: self.kind,
            input_arity: self.input_arity,
            inputs: owned(self.input_names),
            options: owned(self.option_names),
            outputs: owned(self.output_names),
        }
    }
}

/// Serializable snapshot of a descriptor's metadata, for listing indicators
/// and their parameter names in a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorInfo {
    pub name: String,
    pub full_name: String,
    pub kind: IndicatorKind,
    pub input_arity: Arity,
    pub inputs: Vec<String>,
    pub options: Vec<String>,
    pub outputs: Vec<String>,
}

/// Collects descriptor parts and checks the shape invariants in [`build`](Self::build).
#[derive(Clone)]
pub struct DescriptorBuilder {
    name: &'static str,
    full_name: &'static str,
    kind: IndicatorKind,
    input_arity: Arity,
    input_names: &'static [&'static str],
    option_names: &'static [&'static str],
    output_names: &'static [&'static str],
    check_options: OptionCheckFn,
    lookback: Option<LookbackFn>,
    compute: Option<ComputeFn>,
}

impl DescriptorBuilder {
    pub fn new(name: &'static str, full_name: &'static str, kind: IndicatorKind) -> Self {
        Self {
            name,
            full_name,
            kind,
            input_arity: Arity::Fixed(0),
            input_names: &[],
            option_names: &[],
            output_names: &[],
            check_options: crate::options::no_options,
            lookback: None,
            compute: None,
        }
    }

    pub fn inputs(mut self, arity: Arity, names: &'static [&'static str]) -> Self {
        self.input_arity = arity;
        self.input_names = names;
        self
    }

    /// Shorthand for a fixed input count taken from the name list.
    pub fn fixed_inputs(self, names: &'static [&'static str]) -> Self {
        self.inputs(Arity::Fixed(names.len()), names)
    }

    pub fn options(mut self, names: &'static [&'static str], check: OptionCheckFn) -> Self {
        self.option_names = names;
        self.check_options = check;
        self
    }

    pub fn outputs(mut self, names: &'static [&'static str]) -> Self {
        self.output_names = names;
        self
    }

    pub fn lookback(mut self, f: LookbackFn) -> Self {
        self.lookback = Some(f);
        self
    }

    pub fn compute(mut self, f: ComputeFn) -> Self {
        self.compute = Some(f);
        self
    }

    pub fn build(self) -> Result<IndicatorDescriptor, EngineError> {
        let name = self.name;
        let defect = |reason: String| EngineError::invalid_descriptor(name, reason);

        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(defect(format!(
                "name '{name}' must be non-empty lowercase ascii"
            )));
        }
        if self.full_name.is_empty() {
            return Err(defect("full name is empty".into()));
        }

        let declared = self.input_arity.declared();
        if declared == 0 {
            return Err(defect("at least one input is required".into()));
        }
        if self.input_names.len() != declared {
            return Err(defect(format!(
                "{} input names for {} declared inputs",
                self.input_names.len(),
                declared
            )));
        }
        if self.output_names.is_empty() {
            return Err(defect("at least one output is required".into()));
        }
        if let Some(dup) = first_duplicate(self.output_names) {
            return Err(defect(format!("duplicate output name '{dup}'")));
        }
        if let Some(dup) = first_duplicate(self.option_names) {
            return Err(defect(format!("duplicate option name '{dup}'")));
        }

        let lookback = self
            .lookback
            .ok_or_else(|| defect("missing lookback function".into()))?;
        let compute = self
            .compute
            .ok_or_else(|| defect("missing compute function".into()))?;

        Ok(IndicatorDescriptor {
            name,
            full_name: self.full_name,
            kind: self.kind,
            input_arity: self.input_arity,
            input_names: self.input_names,
            option_names: self.option_names,
            output_names: self.output_names,
            check_options: self.check_options,
            lookback,
            compute,
        })
    }
}

fn first_duplicate(names: &[&'static str]) -> Option<&'static str> {
    let mut seen = HashSet::new();
    names.iter().copied().find(|n| !seen.insert(*n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::single_period;

    fn zero_lookback(_: &[f64]) -> usize {
        0
    }

    fn copy_first(inputs: &[&[f64]], _: &[f64], outputs: &mut [Vec<f64>]) {
        outputs[0].copy_from_slice(inputs[0]);
    }

    fn base() -> DescriptorBuilder {
        IndicatorDescriptor::builder("ident", "Identity", IndicatorKind::Simple)
            .fixed_inputs(&["real"])
            .outputs(&["ident"])
            .lookback(zero_lookback)
            .compute(copy_first)
    }

    #[test]
    fn well_formed_descriptor_builds() {
        let d = base().build().unwrap();
        assert_eq!(d.name(), "ident");
        assert_eq!(d.input_arity(), Arity::Fixed(1));
        assert_eq!(d.input_names(), &["real"]);
        assert_eq!(d.option_count(), 0);
        assert_eq!(d.output_names(), &["ident"]);
    }

    #[test]
    fn input_name_count_must_match_arity() {
        let err = base()
            .inputs(Arity::Fixed(2), &["real"])
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDescriptor { .. }));
    }

    #[test]
    fn variable_arity_declares_its_minimum() {
        let d = base()
            .inputs(Arity::Variable { min: 1 }, &["real"])
            .build()
            .unwrap();
        assert!(d.input_arity().accepts(1));
        assert!(d.input_arity().accepts(7));
        assert!(!d.input_arity().accepts(0));

        let err = base()
            .inputs(Arity::Variable { min: 0 }, &[])
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDescriptor { .. }));
    }

    #[test]
    fn outputs_are_required_and_unique() {
        assert!(base().outputs(&[]).build().is_err());
        assert!(base().outputs(&["a", "a"]).build().is_err());
    }

    #[test]
    fn missing_compute_is_a_defect() {
        let mut b = base();
        b.compute = None;
        assert!(matches!(
            b.build(),
            Err(EngineError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn bad_names_are_rejected() {
        assert!(IndicatorDescriptor::builder("", "x", IndicatorKind::Math)
            .fixed_inputs(&["real"])
            .outputs(&["x"])
            .lookback(zero_lookback)
            .compute(copy_first)
            .build()
            .is_err());
        assert!(IndicatorDescriptor::builder("Bad Name", "x", IndicatorKind::Math)
            .fixed_inputs(&["real"])
            .outputs(&["x"])
            .lookback(zero_lookback)
            .compute(copy_first)
            .build()
            .is_err());
    }

    #[test]
    fn option_errors_name_the_option() {
        let d = base()
            .options(&["period"], single_period)
            .build()
            .unwrap();
        let err = d.check_options(&[0.0]).unwrap_err();
        match err {
            EngineError::InvalidOption { option, value, .. } => {
                assert_eq!(option, "period");
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let err = d.lookback(&[]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ArityMismatch {
                what: ArityKind::Options,
                ..
            }
        ));
    }

    #[test]
    fn info_owns_its_names() {
        let info = base().build().unwrap().info();
        assert_eq!(info.inputs, vec!["real".to_string()]);
        assert_eq!(info.kind, IndicatorKind::Simple);
    }
}

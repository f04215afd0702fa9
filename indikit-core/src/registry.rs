//! Indicator registry: an immutable catalog from indicator id to descriptor.
//!
//! Registration happens on a [`RegistryBuilder`]; the built [`Registry`] has
//! no way to add or remove entries. The process-wide built-in catalog is
//! created on first use by [`registry`] and shared read-only afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::bar::{bar_columns, Bar};
use crate::descriptor::{DescriptorBuilder, IndicatorDescriptor};
use crate::driver::{evaluate, EvaluationResult};
use crate::error::EngineError;
use crate::indicators;

/// Short indicator name, e.g. `"sma"`. Unique within a registry.
pub type IndicatorId = &'static str;

/// Immutable catalog of indicator descriptors, ordered by name.
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: Vec<IndicatorDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// A fresh registry holding every built-in indicator.
    pub fn builtin() -> Result<Self, EngineError> {
        RegistryBuilder::with_builtins().build()
    }

    /// Descriptor registered under `id`.
    pub fn lookup(&self, id: &str) -> Result<&IndicatorDescriptor, EngineError> {
        self.by_name
            .get(id)
            .map(|&i| &self.descriptors[i])
            .ok_or_else(|| EngineError::UnknownIndicator(id.to_string()))
    }

    /// Every registered id, sorted by name.
    pub fn list(&self) -> Vec<IndicatorId> {
        self.descriptors.iter().map(|d| d.name()).collect()
    }

    /// Descriptors in the same order as [`list`](Self::list).
    pub fn iter(&self) -> impl Iterator<Item = &IndicatorDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_name.contains_key(id)
    }

    /// Looks up `id` and evaluates it.
    pub fn evaluate(
        &self,
        id: &str,
        inputs: &[&[f64]],
        options: &[f64],
    ) -> Result<EvaluationResult, EngineError> {
        evaluate(self.lookup(id)?, inputs, options)
    }

    /// Evaluates `id` on a bar history, binding each declared input name to
    /// the bar field of the same name. Indicators over `real` inputs fail
    /// with [`EngineError::UnboundInput`].
    pub fn evaluate_bars<B: Bar>(
        &self,
        id: &str,
        bars: &[B],
        options: &[f64],
    ) -> Result<EvaluationResult, EngineError> {
        let descriptor = self.lookup(id)?;
        let columns = bar_columns(descriptor, bars)?;
        let inputs: Vec<&[f64]> = columns.iter().map(Vec::as_slice).collect();
        evaluate(descriptor, &inputs, options)
    }
}

/// Collects descriptors before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    pending: Vec<DescriptorBuilder>,
}

impl RegistryBuilder {
    pub fn with_builtins() -> Self {
        Self {
            pending: indicators::builtin(),
        }
    }

    pub fn register(mut self, descriptor: DescriptorBuilder) -> Self {
        self.pending.push(descriptor);
        self
    }

    /// Builds every descriptor and freezes the catalog.
    ///
    /// Fails with `InvalidDescriptor` on the first malformed descriptor or
    /// duplicated name.
    pub fn build(self) -> Result<Registry, EngineError> {
        let mut descriptors = self
            .pending
            .into_iter()
            .map(DescriptorBuilder::build)
            .collect::<Result<Vec<_>, _>>()?;
        descriptors.sort_by(|a, b| a.name().cmp(b.name()));

        let mut by_name = HashMap::with_capacity(descriptors.len());
        for (i, d) in descriptors.iter().enumerate() {
            if by_name.insert(d.name(), i).is_some() {
                return Err(EngineError::invalid_descriptor(
                    d.name(),
                    "name registered twice",
                ));
            }
        }

        debug!(indicators = descriptors.len(), "indicator registry built");
        Ok(Registry {
            descriptors,
            by_name,
        })
    }
}

static BUILTIN: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry of built-in indicators.
///
/// Built on first call; every later call returns the same instance.
pub fn registry() -> &'static Registry {
    BUILTIN.get_or_init(|| Registry::builtin().expect("built-in indicator table is well-formed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::Ohlcv;
    use crate::descriptor::IndicatorKind;

    fn identity(inputs: &[&[f64]], _: &[f64], outputs: &mut [Vec<f64>]) {
        outputs[0].copy_from_slice(inputs[0]);
    }

    fn custom(name: &'static str) -> DescriptorBuilder {
        IndicatorDescriptor::builder(name, "Identity", IndicatorKind::Simple)
            .fixed_inputs(&["real"])
            .outputs(&["out"])
            .lookback(|_| 0)
            .compute(identity)
    }

    #[test]
    fn builtin_catalog_is_sorted_and_complete() {
        let reg = registry();
        let ids = reg.list();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.len(), reg.len());
        for id in ["sma", "ema", "rsi", "macd", "bbands", "psar", "mean", "crossover"] {
            assert!(reg.contains(id), "missing {id}");
        }
    }

    #[test]
    fn lookup_unknown_fails() {
        let err = registry().lookup("nonexistent").unwrap_err();
        assert_eq!(err, EngineError::UnknownIndicator("nonexistent".into()));
    }

    #[test]
    fn global_registry_is_shared() {
        assert!(std::ptr::eq(registry(), registry()));
    }

    #[test]
    fn custom_registry() {
        let reg = Registry::builder()
            .register(custom("zeta"))
            .register(custom("alpha"))
            .build()
            .unwrap();
        assert_eq!(reg.list(), vec!["alpha", "zeta"]);
        let r = reg.evaluate("alpha", &[&[1.0, 2.0]], &[]).unwrap();
        assert_eq!(r.outputs()[0], vec![1.0, 2.0]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = RegistryBuilder::with_builtins()
            .register(custom("sma"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidDescriptor { ref indicator, .. } if indicator == "sma"
        ));
    }

    #[test]
    fn malformed_descriptor_fails_the_build() {
        let err = Registry::builder()
            .register(custom("broken").outputs(&[]))
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDescriptor { .. }));
    }

    fn bars() -> Vec<Ohlcv> {
        (0..6)
            .map(|i| {
                let c = 10.0 + i as f64;
                Ohlcv::new(c - 0.5, c + 1.0, c - 1.0, c, 100.0 * (i + 1) as f64)
            })
            .collect()
    }

    #[test]
    fn evaluate_bars_matches_column_evaluation() {
        let bars = bars();
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let by_bar = registry().evaluate_bars("atr", &bars, &[3.0]).unwrap();
        let by_column = registry().evaluate("atr", &[&high, &low, &close], &[3.0]).unwrap();
        assert_eq!(by_bar, by_column);

        let obv = registry().evaluate_bars("obv", &bars, &[]).unwrap();
        assert_eq!(obv.outputs()[0][5], 100.0 * (2 + 3 + 4 + 5 + 6) as f64);
    }

    #[test]
    fn evaluate_bars_accepts_borrowed_bars() {
        let owned = bars();
        let borrowed: Vec<&Ohlcv> = owned.iter().collect();
        let r = registry().evaluate_bars("medprice", &borrowed, &[]).unwrap();
        assert_eq!(r.outputs()[0][0], 10.0);
    }

    #[test]
    fn real_inputs_are_not_bar_fields() {
        let err = registry().evaluate_bars("sma", &bars(), &[3.0]).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnboundInput {
                indicator: "sma".into(),
                input: "real".into(),
            }
        );
    }

    #[test]
    fn custom_bar_can_bind_extra_names() {
        struct Candle(f64);

        impl Bar for Candle {
            fn open(&self) -> f64 {
                self.0
            }
            fn high(&self) -> f64 {
                self.0
            }
            fn low(&self) -> f64 {
                self.0
            }
            fn close(&self) -> f64 {
                self.0
            }
            fn volume(&self) -> f64 {
                0.0
            }
            fn field(&self, input: &str) -> Option<f64> {
                match input {
                    "real" => Some(self.0),
                    _ => None,
                }
            }
        }

        let candles: Vec<Candle> = [1.0, 2.0, 3.0].into_iter().map(Candle).collect();
        let r = registry().evaluate_bars("sma", &candles, &[3.0]).unwrap();
        assert_eq!(r.outputs()[0], vec![2.0]);

        let borrowed: Vec<&Candle> = candles.iter().collect();
        let r = registry().evaluate_bars("sma", &borrowed, &[3.0]).unwrap();
        assert_eq!(r.outputs()[0], vec![2.0]);
    }

    #[test]
    fn evaluate_bars_on_no_bars_is_insufficient_data() {
        let err = registry().evaluate_bars::<Ohlcv>("atr", &[], &[3.0]).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData { required: 3, actual: 0, .. }));
    }
}

//! Indikit Core: technical-indicator evaluation engine.
//!
//! This crate contains:
//! - Immutable indicator descriptors (names, arity, lookback, compute function)
//! - A process-wide read-only registry of built-in indicators
//! - The evaluation driver that validates a call and sizes the output buffers
//! - The built-in catalog (moving averages, oscillators, volume and vector math)
//! - A [`Bar`] trait for evaluating straight from OHLCV records
//!
//! ```
//! use indikit_core::registry;
//!
//! let result = registry()
//!     .evaluate("sma", &[&[1.0, 2.0, 3.0, 4.0, 5.0]], &[3.0])
//!     .unwrap();
//! assert_eq!(result.lookback(), 2);
//! assert_eq!(result.outputs()[0], vec![2.0, 3.0, 4.0]);
//! ```

pub mod bar;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod indicators;
pub mod options;
pub mod registry;
pub mod series;

pub use bar::{Bar, Ohlcv};
pub use descriptor::{
    Arity, ComputeFn, DescriptorBuilder, IndicatorDescriptor, IndicatorInfo, IndicatorKind,
    LookbackFn,
};
pub use driver::{evaluate, EvaluationResult, Series};
pub use error::{ArityKind, EngineError};
pub use registry::{registry, IndicatorId, Registry, RegistryBuilder};

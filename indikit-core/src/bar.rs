//! Price bars as indicator input.
//!
//! Any type exposing OHLCV fields can be evaluated without first splitting it
//! into columns: [`Registry::evaluate_bars`](crate::Registry::evaluate_bars)
//! binds each declared input name (`open`, `high`, `low`, `close`, `volume`)
//! to the matching field.

use serde::{Deserialize, Serialize};

use crate::descriptor::IndicatorDescriptor;
use crate::driver::Series;
use crate::error::EngineError;

/// One OHLCV bar.
pub trait Bar {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    /// Field bound to an indicator input name. Override to bind more names.
    fn field(&self, input: &str) -> Option<f64> {
        match input {
            "open" => Some(self.open()),
            "high" => Some(self.high()),
            "low" => Some(self.low()),
            "close" => Some(self.close()),
            "volume" => Some(self.volume()),
            _ => None,
        }
    }
}

/// Plain OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlcv {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns true if any field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }
}

impl Bar for Ohlcv {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

impl<B: Bar> Bar for &B {
    fn open(&self) -> f64 {
        (**self).open()
    }

    fn high(&self) -> f64 {
        (**self).high()
    }

    fn low(&self) -> f64 {
        (**self).low()
    }

    fn close(&self) -> f64 {
        (**self).close()
    }

    fn volume(&self) -> f64 {
        (**self).volume()
    }

    fn field(&self, input: &str) -> Option<f64> {
        (**self).field(input)
    }
}

/// One column per declared input of `descriptor`, read from `bars`.
pub(crate) fn bar_columns<B: Bar>(
    descriptor: &IndicatorDescriptor,
    bars: &[B],
) -> Result<Vec<Series>, EngineError> {
    descriptor
        .input_names()
        .iter()
        .map(|&input| {
            bars.iter()
                .map(|b| {
                    b.field(input).ok_or_else(|| EngineError::UnboundInput {
                        indicator: descriptor.name().to_string(),
                        input: input.to_string(),
                    })
                })
                .collect()
        })
        .collect()
}

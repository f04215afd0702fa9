//! Engine error type.
//!
//! Every failure is reported synchronously to the caller. Nothing is retried
//! and no partially filled output is ever returned.

use std::fmt;

use thiserror::Error;

/// Which declared count an [`EngineError::ArityMismatch`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityKind {
    Inputs,
    Options,
}

impl fmt::Display for ArityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArityKind::Inputs => f.write_str("inputs"),
            ArityKind::Options => f.write_str("options"),
        }
    }
}

/// Errors raised by the registry, the descriptor builder and the evaluation driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("{indicator}: expected {expected} {what}, got {actual}")]
    ArityMismatch {
        indicator: String,
        what: ArityKind,
        expected: String,
        actual: usize,
    },

    #[error("{indicator}: insufficient data: need {required} samples, got {actual}")]
    InsufficientData {
        indicator: String,
        required: usize,
        actual: usize,
    },

    #[error("{indicator}: invalid descriptor: {reason}")]
    InvalidDescriptor { indicator: String, reason: String },

    #[error("{indicator}: invalid option '{option}' = {value}: {reason}")]
    InvalidOption {
        indicator: String,
        option: String,
        value: f64,
        reason: String,
    },

    #[error("{indicator}: input series lengths differ: expected {expected}, got {actual}")]
    LengthMismatch {
        indicator: String,
        expected: usize,
        actual: usize,
    },

    #[error("{indicator}: input '{input}' is not a bar field")]
    UnboundInput { indicator: String, input: String },
}

impl EngineError {
    pub(crate) fn invalid_descriptor(indicator: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidDescriptor {
            indicator: indicator.to_string(),
            reason: reason.into(),
        }
    }
}
